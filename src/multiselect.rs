use crate::filter::{OptionSet, Selection};
use crate::state::DynamicFilter;
use leptos::*;

/// Toggle buttons for one filter field. Changes only touch the staged
/// selection.
#[component]
pub fn MultiSelect(
    options: OptionSet,
    hint: Option<DynamicFilter>,
    selection: RwSignal<Selection>,
) -> impl IntoView {
    let field = options.field;
    let meanings = hint
        .as_ref()
        .and_then(|hint| hint.value_meanings.clone())
        .unwrap_or_default();
    let buttons = options
        .options
        .into_iter()
        .map(|option| {
            let value = option.value.clone();
            let toggle_value = value.clone();
            let title = meanings.get(&option.value).cloned().unwrap_or_default();
            let class = move || {
                if selection.with(|selection| selection.is_selected(field, &value)) {
                    "text-sm px-2 py-1 rounded border bg-blue-500 text-white"
                } else {
                    "text-sm px-2 py-1 rounded border bg-gray-100 hover:bg-gray-200 dark:bg-gray-700 dark:text-white"
                }
            };
            view! {
                <button
                    type="button"
                    class=class
                    title=title
                    on:click=move |_| selection.update(|selection| selection.toggle(field, &toggle_value))
                >
                    {option.label}
                </button>
            }
        })
        .collect::<Vec<_>>();
    view! {
        <div class="border rounded p-2 dark:border-gray-700">
            <span class="font-semibold text-sm block mb-1">
                {field.label()}
                {move || {
                    let count = selection.with(|selection| selection.values(field).len());
                    (count > 0).then(|| format!(" ({count} selected)"))
                }}
            </span>
            {hint.map(|hint| view! { <span class="text-xs text-gray-500 block mb-1">{hint.question}</span> })}
            <div class="flex flex-wrap gap-2">{buttons}</div>
        </div>
    }
}
