use crate::route::Link;
use crate::sources;
use crate::state::Role;
use crate::transcript::Entry;
use leptos::IntoView;
use leptos::*;
use pulldown_cmark::{CowStr, Event, Parser, Tag};

/// Relative links and a few harmless schemes; anything else (`javascript:`,
/// `data:`, ...) is not followed.
fn is_safe_url(url: &str) -> bool {
    let url = url.trim();
    match url.find(':') {
        None => true,
        Some(colon) if url[..colon].contains(['/', '?', '#']) => true,
        Some(colon) => {
            let scheme = url[..colon].to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto")
        }
    }
}

fn neutralize(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) {
        url
    } else {
        CowStr::Borrowed("#")
    }
}

/// Markdown to HTML. Raw HTML in the answer is shown as text and links
/// only keep safe targets.
pub fn render_markdown(content: &str) -> String {
    let parser = Parser::new(content).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: neutralize(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: neutralize(dest_url),
            title,
            id,
        }),
        event => event,
    });
    let mut parsed = String::new();
    pulldown_cmark::html::push_html(&mut parsed, parser);
    parsed
}

#[component]
fn Sources(sources: String) -> impl IntoView {
    let citations = sources::parse(&sources);
    if citations.is_empty() {
        return ().into_view();
    }
    let links = citations
        .into_iter()
        .map(|citation| {
            view! {
                <Link
                    href=citation.href()
                    class="text-nowrap text-xs px-2 py-1 rounded border border-gray-400 hover:bg-gray-200 dark:hover:bg-gray-600"
                >
                    {citation.label}
                </Link>
            }
        })
        .collect::<Vec<_>>();
    view! {
        <div class="mt-2">
            <span class="text-xs text-gray-500">"Sources:"</span>
            <div class="flex flex-wrap gap-2 mt-1">{links}</div>
        </div>
    }
    .into_view()
}

#[component]
pub fn Message(entry: Entry) -> impl IntoView {
    let pending = entry.is_pending();
    let message = entry.message().clone();
    let is_me = message.role == Role::Human;
    let author = if is_me { "You" } else { "AI" };
    let bubble = if is_me {
        "flex flex-col leading-1.5 p-4 rounded-s-xl rounded-ee-xl bg-blue-100 text-gray-900 dark:bg-blue-900 dark:text-white"
    } else {
        "flex flex-col leading-1.5 p-4 rounded-e-xl rounded-es-xl bg-gray-100 text-gray-900 dark:bg-gray-700 dark:text-white"
    };
    let body = if is_me {
        view! { <p class="text-sm font-normal whitespace-pre-wrap">{message.content.clone()}</p> }.into_view()
    } else {
        let parsed = render_markdown(&message.content);
        view! { <div class="text-sm font-normal prose dark:prose-invert" inner_html=parsed /> }.into_view()
    };
    let sources = message
        .sources
        .filter(|sources| !is_me && !sources.trim().is_empty())
        .map(|sources| view! { <Sources sources=sources /> });
    view! {
        <div class="flex items-start m-5 gap-2.5" class:flex-row-reverse=is_me class:opacity-60=pending>
            <div class="flex flex-col gap-1 max-w-[75%]">
                <div class="flex items-center space-x-2 rtl:space-x-reverse">
                    <span class="text-sm font-semibold text-gray-900 dark:text-white">{author}</span>
                    <Show when=move || pending>
                        <span class="text-sm font-normal text-gray-500 dark:text-gray-400">"Sending..."</span>
                    </Show>
                </div>
                <div class=bubble>
                    {body}
                    {sources}
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown() {
        assert_eq!(render_markdown("hello world"), "<p>hello world</p>\n");
        assert_eq!(
            render_markdown("Visit **Lisbon**"),
            "<p>Visit <strong>Lisbon</strong></p>\n"
        );
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render_markdown("<script>alert(1)</script>");
        assert!(!html.contains("<script>"), "{html}");
        assert!(html.contains("&lt;script&gt;"), "{html}");
    }

    #[test]
    fn script_links_are_dropped() {
        let html = render_markdown("[Lisbon](javascript:alert(document.cookie))");
        assert!(!html.contains("javascript:"), "{html}");
        assert!(html.contains(r##"<a href="#">Lisbon</a>"##), "{html}");

        let html = render_markdown("![x](JavaScript:alert(1)) [y](data:text/html,hi)");
        assert!(!html.to_lowercase().contains("javascript:"), "{html}");
        assert!(!html.contains("data:"), "{html}");
    }

    #[test]
    fn ordinary_links_survive() {
        assert_eq!(
            render_markdown("[Porto](https://visitporto.travel)"),
            "<p><a href=\"https://visitporto.travel\">Porto</a></p>\n"
        );
        assert!(render_markdown("[Oslo](/destinations/ab12)").contains(r#"href="/destinations/ab12""#));
        assert!(render_markdown("[mail](mailto:a@b.c)").contains(r#"href="mailto:a@b.c""#));
        assert!(is_safe_url("?page=2"));
        assert!(is_safe_url("/a:b"));
        assert!(!is_safe_url(" vbscript:x"));
    }
}
