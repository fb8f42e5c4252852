// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{ComponentKind, ImportedComponent};

const FALLBACK_IDENT: &str = "Component";

fn word_regex() -> &'static Regex {
    static WORDS: OnceLock<Regex> = OnceLock::new();
    WORDS.get_or_init(|| Regex::new(r"[A-Za-z0-9]+").expect("valid word regex"))
}

/// Turns a design-tool display name into a PascalCase function identifier.
pub fn component_ident(display_name: &str) -> String {
    let mut ident = String::new();
    for word in word_regex().find_iter(display_name) {
        let mut chars = word.as_str().chars();
        if let Some(first) = chars.next() {
            ident.push(first.to_ascii_uppercase());
            ident.extend(chars);
        }
    }

    match ident.chars().next() {
        None => FALLBACK_IDENT.to_owned(),
        Some(first) if first.is_ascii_digit() => format!("{FALLBACK_IDENT}{ident}"),
        Some(_) => ident,
    }
}

/// Deterministic source for a selected imported component. Always parses as markup.
pub fn synthesize_component_source(component: &ImportedComponent) -> String {
    let ident = component_ident(component.display_name());
    let tag = match component.kind() {
        ComponentKind::Frame => "section",
        ComponentKind::Component | ComponentKind::Other => "div",
    };
    let comment_name = component.display_name().replace(char::is_control, " ");

    format!(
        "// React component for {comment_name} ({kind})\nexport function {ident}() {{\n  return (\n    <{tag} data-import-id=\"{id}\">{label} Component</{tag}>\n  )\n}}\n",
        kind = component.kind(),
        id = escape_markup(component.id().as_str()),
        label = escape_markup(component.display_name().trim()),
    )
}

fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            '"' => out.push_str("&quot;"),
            ch if ch.is_control() => out.push(' '),
            ch => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{component_ident, synthesize_component_source};
    use crate::format::markup::{parse_markup, MarkupNodeKind};
    use crate::model::{ComponentId, ComponentKind, ImportedComponent};

    #[rstest]
    #[case("Header", "Header")]
    #[case("primary button", "PrimaryButton")]
    #[case("nav-bar / mobile", "NavBarMobile")]
    #[case("404 page", "Component404Page")]
    #[case("✨", "Component")]
    fn display_names_become_identifiers(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(component_ident(name), expected);
    }

    #[test]
    fn synthesized_frame_source_matches_expected_shape() {
        let component = ImportedComponent::new(
            ComponentId::new("1").expect("id"),
            "Header",
            ComponentKind::Frame,
        );
        assert_eq!(
            synthesize_component_source(&component),
            "// React component for Header (FRAME)\nexport function Header() {\n  return (\n    <section data-import-id=\"1\">Header Component</section>\n  )\n}\n"
        );
    }

    #[test]
    fn hostile_names_still_produce_renderable_source() {
        let component = ImportedComponent::new(
            ComponentId::new("x\"y").expect("id"),
            "<Card>\n{oops}",
            ComponentKind::Component,
        );
        let source = synthesize_component_source(&component);
        let root = parse_markup(&source).expect("parse").root.expect("root");
        assert_eq!(root.tag(), Some("div"));
        assert_eq!(
            root.children[0].kind,
            MarkupNodeKind::Text { content: "&lt;Card&gt; &#123;oops&#125; Component".to_owned() }
        );
    }
}
