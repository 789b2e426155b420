use leptos::prelude::*;

/// Инлайновая SVG-иконка по имени (набор в духе lucide, 16x16).
pub fn icon(name: &str) -> impl IntoView {
    let path = match name {
        "chevron-left" => r#"<polyline points="10 12 6 8 10 4"/>"#,
        "chevron-right" => r#"<polyline points="6 4 10 8 6 12"/>"#,
        "chevrons-left" => r#"<polyline points="9 12 5 8 9 4"/><polyline points="13 12 9 8 13 4"/>"#,
        "chevrons-right" => r#"<polyline points="3 4 7 8 3 12"/><polyline points="7 4 11 8 7 12"/>"#,
        "plus" => r#"<line x1="8" y1="3" x2="8" y2="13"/><line x1="3" y1="8" x2="13" y2="8"/>"#,
        "x" => r#"<line x1="4" y1="4" x2="12" y2="12"/><line x1="12" y1="4" x2="4" y2="12"/>"#,
        "eye" => r#"<path d="M1 8s2.5-5 7-5 7 5 7 5-2.5 5-7 5-7-5-7-5z"/><circle cx="8" cy="8" r="2"/>"#,
        "eye-off" => r#"<path d="M1 8s2.5-5 7-5 7 5 7 5-2.5 5-7 5-7-5-7-5z"/><line x1="2" y1="2" x2="14" y2="14"/>"#,
        "check" => r#"<polyline points="3 8 7 12 13 4"/>"#,
        "trash" => r#"<polyline points="2 4 14 4"/><path d="M5 4v9h6V4"/><line x1="6" y1="2" x2="10" y2="2"/>"#,
        "pencil" => r#"<path d="M11 2l3 3-8 8H3v-3l8-8z"/>"#,
        _ => "",
    };
    let svg = format!(
        r#"<svg width="16" height="16" viewBox="0 0 16 16" fill="none" stroke="currentColor" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round">{path}</svg>"#
    );
    view! { <span class="icon" inner_html=svg></span> }
}
