use crate::auth::use_auth;
use crate::route::{use_navigator, Link, Route};
use crate::state::{Chat, Id};
use ev::MouseEvent;
use leptos::*;

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let navigator = use_navigator();
    let logout = move |_| {
        auth.logout();
        navigator.push(Route::Login);
    };
    let link = "block py-2 px-3 text-gray-300 rounded hover:bg-gray-700 hover:text-white";
    view! {
        <nav class="bg-gray-800 border-gray-700">
            <div class="flex flex-wrap items-center justify-between mx-auto p-4">
                <Link href="/" class="text-xl font-semibold text-white">
                    "Travel App"
                </Link>
                {move || match auth.session() {
                    Some(session) => view! {
                        <ul class="flex flex-row space-x-4 font-medium">
                            <li><Link href="/destinations" class=link>"Destinations"</Link></li>
                            <li><Link href="/map" class=link>"Map"</Link></li>
                            <li><Link href="/chat" class=link>"Chat"</Link></li>
                        </ul>
                        <div class="flex items-center space-x-3">
                            <span class="text-gray-300">"Hello, " {session.username}</span>
                            <button
                                type="button"
                                class="text-white border border-white hover:bg-gray-700 font-medium rounded-lg text-sm px-4 py-2"
                                on:click=logout
                            >
                                "Logout"
                            </button>
                        </div>
                    }
                    .into_view(),
                    None => view! {
                        <Link href="/login" class=link>
                            "Login"
                        </Link>
                    }
                    .into_view(),
                }}
            </div>
        </nav>
    }
}

/// Sidebar of the chat page: the user's chats plus a button to start one.
#[component]
pub fn ChatNav<T, U>(
    #[prop(into)] chats: Signal<Option<Vec<Chat>>>,
    #[prop(into)] active: Signal<Option<Id>>,
    on_select_chat: T,
    create_chat: U,
) -> impl IntoView
where
    T: Fn(Id) + 'static + Clone,
    U: Fn() + 'static + Clone,
{
    let (show, set_show) = create_signal(true);
    let new_chat = move |_| create_chat();
    view! {
        {move || {
            if show.get() {
                view! { <div /> }
            } else {
                view! {
                    <div
                        class="lg:hidden text-gray-500 dark:text-gray-400 p-5 absolute top-16 left-0"
                        on:click=move |_| set_show.update(|s| *s = !*s)
                    >
                        <svg viewBox="0 0 10 8" width="20">
                            <path
                                d="M1 1h8M1 4h 8M1 7h8"
                                stroke="currentColor"
                                fill="currentColor"
                                stroke-width="2"
                                stroke-linecap="round"
                            />
                        </svg>
                    </div>
                }
            }
        }}
        <div
            class="lg:w-1/5 w-full lg:flex border-e-2 dark:border-gray-800 overflow-y-auto dark:text-white bg-gray-50 dark:bg-gray-800"
            class:hidden=move || !show.get()
        >
            <div class="text-center w-full flex flex-col">
                <div class="m-4">
                    <button
                        type="button"
                        class="w-full text-white bg-blue-700 hover:bg-blue-800 focus:ring-4 focus:ring-blue-300 font-medium rounded-lg text-sm px-5 py-2.5"
                        on:click=new_chat
                    >
                        "+ New Chat"
                    </button>
                </div>
                <div class="py-4 overflow-y-auto grow">
                    {move || match chats.get() {
                        None => view! { <p class="text-sm text-gray-500">"Loading chats..."</p> }.into_view(),
                        Some(chats) if chats.is_empty() => {
                            view! { <p class="text-sm text-gray-500">"No chats yet"</p> }.into_view()
                        }
                        Some(chats) => {
                            let items = chats
                                .into_iter()
                                .map(|chat| {
                                    let select = on_select_chat.clone();
                                    let id = chat.id.clone();
                                    let class = {
                                        let id = id.clone();
                                        move || {
                                            if active.get().as_ref() == Some(&id) {
                                                "flex items-center p-2 rounded-lg bg-blue-100 text-gray-900 dark:bg-gray-700 dark:text-white"
                                            } else {
                                                "flex items-center p-2 rounded-lg text-gray-900 dark:text-white hover:bg-gray-100 dark:hover:bg-gray-700"
                                            }
                                        }
                                    };
                                    let label = match chat.updated_label() {
                                        Some(date) => format!("Chat - {date}"),
                                        None => format!("Chat {}", chat.id),
                                    };
                                    let onclick = move |ev: MouseEvent| {
                                        ev.prevent_default();
                                        // Only useful on mobile
                                        set_show.set(false);
                                        select(id.clone());
                                    };
                                    view! {
                                        <li on:click=onclick>
                                            <a href="#" class=class>
                                                <span class="ms-3">{label}</span>
                                            </a>
                                        </li>
                                    }
                                })
                                .collect::<Vec<_>>();
                            view! { <ul class="space-y-2 font-medium">{items}</ul> }.into_view()
                        }
                    }}
                </div>
            </div>
        </div>
    }
}
