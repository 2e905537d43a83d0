use crate::api::Api;
use crate::auth::use_auth;
use crate::loading::Loading;
use crate::message::Message;
use crate::nav::ChatNav;
use crate::route::{use_navigator, Route};
use crate::state::Id;
use crate::transcript::{short_id, ChatPhase, Transcript};
use leptos::leptos_dom::ev::SubmitEvent;
use leptos::logging::{error, log, warn};
use leptos::*;

#[component]
pub fn ChatPage(initial: Option<Id>) -> impl IntoView {
    let auth = use_auth();
    let navigator = use_navigator();
    let api = expect_context::<Api>();

    let phase = create_rw_signal(ChatPhase::NoChatSelected);
    let transcript = create_rw_signal(Transcript::default());
    let (message, set_message) = create_signal(String::new());
    let (sending, set_sending) = create_signal(false);

    let chats = create_local_resource(|| (), {
        let api = api.clone();
        move |_| {
            let api = api.clone();
            let session = untrack(|| auth.session());
            async move {
                let Some(session) = session else {
                    return Vec::new();
                };
                api.chats(&session.credentials(), &session.user_id)
                    .await
                    .unwrap_or_else(|err| {
                        error!("Failed to fetch chats: {err}");
                        Vec::new()
                    })
            }
        }
    });

    let load_history = {
        let api = api.clone();
        move |id: Id| {
            phase.set(ChatPhase::HistoryLoading(id.clone()));
            transcript.set(Transcript::default());
            let api = api.clone();
            let credentials = auth.credentials();
            spawn_local(async move {
                let history = api.history(&credentials, &id).await;
                // The user may have moved on to another chat meanwhile.
                if phase.with_untracked(|phase| phase.active() != Some(&id)) {
                    return;
                }
                match history {
                    Ok(history) => transcript.set(Transcript::from_history(history)),
                    Err(err) => error!("Failed to fetch history of chat {id}: {err}"),
                }
                phase.set(ChatPhase::HistoryLoaded(id));
            });
        }
    };

    let select_chat = {
        let load_history = load_history.clone();
        move |id: Id| {
            navigator.push_address(&Route::Chat(Some(id.clone())));
            load_history(id);
        }
    };

    if let Some(id) = initial {
        load_history(id);
    }

    let create_chat = {
        let api = api.clone();
        let select_chat = select_chat.clone();
        move || {
            let Some(session) = auth.session() else {
                return;
            };
            let api = api.clone();
            let select_chat = select_chat.clone();
            spawn_local(async move {
                match api.create_chat(&session.credentials(), &session.user_id).await {
                    Ok(chat) => {
                        log!("Created chat {}", chat.id);
                        select_chat(chat.id);
                        chats.refetch();
                    }
                    Err(err) => error!("Failed to create chat: {err}"),
                }
            });
        }
    };

    let update_message = move |ev| {
        let v = event_target_value(&ev);
        set_message.set(v);
    };
    let send_message = move |ev: SubmitEvent| {
        ev.prevent_default();
        if sending.get_untracked() || !phase.with_untracked(ChatPhase::accepts_input) {
            return;
        }
        let Some(session) = auth.session() else {
            return;
        };
        let input = message.get_untracked();
        let Some(prompt) = transcript.try_update(|transcript| transcript.begin(&input)).flatten()
        else {
            return;
        };
        set_message.set(String::new());
        set_sending.set(true);

        let chat_id = phase.with_untracked(|phase| phase.active().cloned());
        let api = api.clone();
        spawn_local(async move {
            let credentials = session.credentials();
            let reply = api
                .send_prompt(&credentials, &prompt, chat_id.as_ref(), &session.user_id)
                .await;
            set_sending.set(false);
            if phase.with_untracked(|phase| phase.active() != chat_id.as_ref()) {
                warn!("Dropping reply for a chat that is no longer open");
                return;
            }
            let reply = match reply {
                Ok(reply) => reply,
                Err(err) => {
                    error!("Failed to send message: {err}");
                    transcript.update(Transcript::rollback);
                    return;
                }
            };
            transcript.update(|transcript| transcript.answer(&reply));

            let id = reply.chat_id;
            if chat_id.as_ref() != Some(&id) {
                navigator.replace_address(&Route::Chat(Some(id.clone())));
                chats.refetch();
            }
            phase.set(ChatPhase::HistoryLoaded(id.clone()));

            match api.history(&credentials, &id).await {
                Ok(history) if phase.with_untracked(|phase| phase.active() == Some(&id)) => {
                    transcript.update(|transcript| transcript.reconcile(history));
                }
                Ok(_) => {}
                Err(err) => warn!("Could not refresh chat {id}: {err}"),
            }
        });
    };

    let chat_list = Signal::derive(move || chats.get());
    let active = Signal::derive(move || phase.with(|phase| phase.active().cloned()));
    let header = move || match phase.with(|phase| phase.active().map(short_id)) {
        Some(id) => format!("Chat Session: {id}..."),
        None => "New conversation".to_string(),
    };

    view! {
        <div class="grow flex lg:flex-row flex-col">
            <ChatNav chats=chat_list active=active on_select_chat=select_chat create_chat=create_chat />
            <div class="h-[calc(100dvh-4rem)] grow flex flex-col scrollbar lg:w-4/5 w-screen max-w-screen">
                <h2 class="px-5 py-3 text-lg font-semibold border-b dark:border-gray-800 dark:text-white">
                    {header}
                </h2>
                <div class="grow flex flex-col-reverse overflow-auto">
                    <Show
                        when=move || !phase.with(ChatPhase::is_loading)
                        fallback=move || view! { <Loading label="Loading history..." /> }
                    >
                        {move || {
                            transcript
                                .with(|transcript| {
                                    if transcript.is_empty() {
                                        return view! {
                                            <p class="m-auto text-gray-500 dark:text-gray-400">
                                                "Ask about a destination to get started."
                                            </p>
                                        }
                                        .into_view();
                                    }
                                    transcript
                                        .entries()
                                        .iter()
                                        .rev()
                                        .cloned()
                                        .map(|entry| view! { <Message entry=entry /> })
                                        .collect::<Vec<_>>()
                                        .into_view()
                                })
                        }}
                    </Show>
                </div>
                <form class="w-full" on:submit=send_message>
                    <label for="chat" class="sr-only">
                        "Your message"
                    </label>
                    <div class="flex items-center px-3 py-2 bg-gray-50 dark:bg-gray-700">
                        <input
                            id="chat"
                            class="block mx-4 p-2.5 w-full text-sm text-gray-900 bg-white rounded-lg border border-gray-300 focus:ring-blue-500 focus:border-blue-500 dark:bg-gray-800 dark:border-gray-600 dark:placeholder-gray-400 dark:text-white dark:focus:ring-blue-500 dark:focus:border-blue-500"
                            placeholder="Ask about destinations..."
                            on:input=update_message
                            prop:value=message
                        />
                        <button
                            type="submit"
                            disabled=move || sending.get() || !phase.with(ChatPhase::accepts_input)
                            class="inline-flex justify-center p-2 text-blue-600 rounded-full cursor-pointer hover:bg-blue-100 disabled:opacity-50 dark:text-blue-500 dark:hover:bg-gray-600"
                        >
                            <svg
                                class="w-5 h-5 rotate-90 rtl:-rotate-90"
                                aria-hidden="true"
                                xmlns="http://www.w3.org/2000/svg"
                                fill="currentColor"
                                viewBox="0 0 18 20"
                            >
                                <path d="m17.914 18.594-8-18a1 1 0 0 0-1.828 0l-8 18a1 1 0 0 0 1.157 1.376L8 18.281V9a1 1 0 0 1 2 0v9.281l6.758 1.689a1 1 0 0 0 1.156-1.376Z" />
                            </svg>
                            <span class="sr-only">"Send message"</span>
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
