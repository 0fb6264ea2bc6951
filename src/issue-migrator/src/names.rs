//! Display names for source tracker attributes and relation types.

/// Attribute detail names with a fixed display label.
const ATTRIBUTE_LABELS: &[(&str, &str)] = &[
    ("project_id", "Project"),
    ("tracker_id", "Tracker"),
    ("subject", "Subject"),
    ("description", "Description"),
    ("status_id", "Status"),
    ("priority_id", "Priority"),
    ("assigned_to_id", "Assigned to"),
    ("author_id", "Author"),
    ("category_id", "Category"),
    ("fixed_version_id", "Target Version"),
    ("parent_id", "Parent task"),
    ("start_date", "Start date"),
    ("due_date", "Due date"),
    ("done_ratio", "% Done"),
    ("estimated_hours", "Estimated time"),
    ("is_private", "Private"),
];

/// Relation types and their labels, seen from the originating issue.
const RELATION_LABELS: &[(&str, &str)] = &[
    ("relates", "Related to"),
    ("duplicates", "Duplicates"),
    ("duplicated", "Duplicated by"),
    ("blocks", "Blocks"),
    ("blocked", "Blocked by"),
    ("precedes", "Precedes"),
    ("follows", "Follows"),
    ("copied_to", "Copied to"),
    ("copied_from", "Copied from"),
];

/// Relation types paired with the type seen from the other end.
const RELATION_INVERSES: &[(&str, &str)] = &[
    ("relates", "relates"),
    ("duplicates", "duplicated"),
    ("blocks", "blocked"),
    ("precedes", "follows"),
    ("copied_to", "copied_from"),
];

/// Turns `foo_bar_id` into `Foo Bar`.
#[must_use]
pub fn title_case(key: &str) -> String {
    let key = key.strip_suffix("_id").unwrap_or(key);
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Returns the label of an attribute detail name.
#[must_use]
pub fn attribute_label(name: &str) -> String {
    ATTRIBUTE_LABELS
        .iter()
        .find(|(key, _)| *key == name)
        .map_or_else(|| title_case(name), |(_, label)| (*label).to_string())
}

/// Returns the label of a relation type.
#[must_use]
pub fn relation_label(relation_type: &str) -> String {
    RELATION_LABELS
        .iter()
        .find(|(key, _)| *key == relation_type)
        .map_or_else(|| title_case(relation_type), |(_, label)| (*label).to_string())
}

/// Returns the relation type as seen from the other issue of the relation.
#[must_use]
pub fn inverse_relation_type(relation_type: &str) -> &str {
    RELATION_INVERSES
        .iter()
        .find_map(|(forward, backward)| {
            if *forward == relation_type {
                Some(*backward)
            } else if *backward == relation_type {
                Some(*forward)
            } else {
                None
            }
        })
        .unwrap_or(relation_type)
}
