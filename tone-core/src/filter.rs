//! Client-side search over loaded lists.

/// Keep the items for which any selector's text contains `term`
/// (case-insensitive). A blank term keeps everything.
pub fn filter_by_fields<'a, T>(
    items: &'a [T],
    term: &str,
    selectors: &[fn(&T) -> Option<String>],
) -> Vec<&'a T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            selectors.iter().any(|select| {
                select(item)
                    .map(|text| text.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        email: Option<&'static str>,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Ada", email: Some("ada@example.com") },
            Row { name: "Grace", email: None },
            Row { name: "Linus", email: Some("torvalds@kernel.org") },
        ]
    }

    #[test]
    fn blank_term_keeps_all() {
        let rows = rows();
        let selectors: [fn(&Row) -> Option<String>; 1] = [|r| Some(r.name.to_string())];
        assert_eq!(filter_by_fields(&rows, "   ", &selectors).len(), 3);
    }

    #[test]
    fn matches_any_selector_case_insensitively() {
        let rows = rows();
        let selectors: [fn(&Row) -> Option<String>; 2] = [
            |r| Some(r.name.to_string()),
            |r| r.email.map(str::to_string),
        ];
        let hits = filter_by_fields(&rows, "KERNEL", &selectors);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Linus");

        let hits = filter_by_fields(&rows, " gra ", &selectors);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Grace");
    }
}
