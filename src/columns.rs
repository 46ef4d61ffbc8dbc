//! Static column schema and the mutable list of currently displayed columns.

/// One entry of the fixed table schema. Constructed once, never mutated.
#[derive(Debug)]
pub struct ColumnDef {
    pub position: usize,
    pub name: &'static str,
    pub label: &'static str,
    pub show_hide: bool,
    pub printable: bool,
}

/// The full schema in declared order. The `expand` column carries the
/// detail-row marker and is neither toggleable nor printed.
pub const COLUMNS: &[ColumnDef] = &[
    ColumnDef {
        position: 0,
        name: "expand",
        label: "",
        show_hide: false,
        printable: false,
    },
    ColumnDef {
        position: 1,
        name: "id",
        label: "ID",
        show_hide: true,
        printable: true,
    },
    ColumnDef {
        position: 2,
        name: "name",
        label: "Name",
        show_hide: true,
        printable: true,
    },
    ColumnDef {
        position: 3,
        name: "username",
        label: "Username",
        show_hide: true,
        printable: true,
    },
    ColumnDef {
        position: 4,
        name: "email",
        label: "E-mail",
        show_hide: true,
        printable: true,
    },
    ColumnDef {
        position: 5,
        name: "phone",
        label: "Phone",
        show_hide: true,
        printable: true,
    },
    ColumnDef {
        position: 6,
        name: "salary",
        label: "Salary",
        show_hide: true,
        printable: true,
    },
];

pub fn column(name: &str) -> Option<&'static ColumnDef> {
    COLUMNS.iter().find(|c| c.name == name)
}

/// All column names in declared order, the initial display state.
pub fn display_order() -> Vec<String> {
    COLUMNS.iter().map(|c| c.name.to_string()).collect()
}

/// One row of the show/hide panel, tagged with the column's declared
/// position so a re-activated column can be put back near its old slot.
#[derive(Debug, Clone)]
pub struct ToggleEntry {
    pub position: usize,
    pub name: String,
    pub label: String,
    pub active: bool,
}

pub fn toggle_entries() -> Vec<ToggleEntry> {
    COLUMNS
        .iter()
        .filter(|c| c.show_hide)
        .map(|c| ToggleEntry {
            position: c.position,
            name: c.name.to_string(),
            label: c.label.to_string(),
            active: true,
        })
        .collect()
}

/// The ordered sequence of column names currently rendered.
///
/// `toggle` keeps the legacy splice semantics: a re-activated column is
/// inserted at its raw declared position when that index is still within
/// bounds, otherwise appended. Because the list shrinks and grows as
/// columns are toggled, the insertion point can drift from the declared
/// order, and activating an already-present name inserts it twice. Both
/// behaviors are pinned by the tests below.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    displayed: Vec<String>,
}

impl ColumnLayout {
    pub fn new() -> Self {
        Self {
            displayed: display_order(),
        }
    }

    pub fn displayed(&self) -> &[String] {
        &self.displayed
    }

    pub fn toggle(&mut self, name: &str, active: bool, position: usize) {
        if active {
            if position >= self.displayed.len() {
                self.displayed.push(name.to_string());
            } else {
                self.displayed.insert(position, name.to_string());
            }
        } else if let Some(i) = self.displayed.iter().position(|n| n == name) {
            self.displayed.remove(i);
        }
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout_of(names: &[&str]) -> ColumnLayout {
        ColumnLayout {
            displayed: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[test]
    fn schema_is_stable() {
        assert_eq!(COLUMNS.len(), 7);
        for (i, c) in COLUMNS.iter().enumerate() {
            assert_eq!(c.position, i);
        }
        assert_eq!(column("salary").map(|c| c.label), Some("Salary"));
        assert!(column("bogus").is_none());
    }

    #[test]
    fn initial_display_covers_the_whole_schema() {
        let layout = ColumnLayout::new();
        let names: Vec<&str> = COLUMNS.iter().map(|c| c.name).collect();
        assert_eq!(layout.displayed(), names.as_slice());
    }

    #[test]
    fn toggle_entries_skip_the_expand_column() {
        let entries = toggle_entries();
        assert_eq!(entries.len(), 6);
        assert!(entries.iter().all(|e| e.active));
        assert!(entries.iter().all(|e| e.name != "expand"));
        assert_eq!(entries[0].position, 1);
    }

    #[test]
    fn deactivating_an_absent_column_is_a_noop() {
        let mut layout = layout_of(&["a", "b"]);
        layout.toggle("c", false, 2);
        assert_eq!(layout.displayed(), ["a", "b"]);
    }

    #[test]
    fn deactivating_removes_the_first_occurrence_only() {
        let mut layout = layout_of(&["a", "b", "a"]);
        layout.toggle("a", false, 0);
        assert_eq!(layout.displayed(), ["b", "a"]);
    }

    #[test]
    fn activating_twice_inserts_a_duplicate() {
        let mut layout = layout_of(&["a", "b"]);
        layout.toggle("c", true, 1);
        layout.toggle("c", true, 1);
        assert_eq!(layout.displayed(), ["a", "c", "c", "b"]);
    }

    #[test]
    fn activating_past_the_end_appends() {
        let mut layout = layout_of(&["a"]);
        layout.toggle("z", true, 5);
        assert_eq!(layout.displayed(), ["a", "z"]);
    }

    #[test]
    fn activating_into_an_empty_list_appends() {
        let mut layout = layout_of(&[]);
        layout.toggle("a", true, 0);
        assert_eq!(layout.displayed(), ["a"]);
    }

    // The drift scenario: with D still shifted left, B's declared position 1
    // is within bounds again, so B lands back at its original slot. The raw
    // position is reused verbatim, it is not re-derived from the schema.
    #[test]
    fn reactivation_reuses_the_raw_declared_position() {
        let mut layout = layout_of(&["a", "b", "c", "d"]);
        layout.toggle("b", false, 1);
        assert_eq!(layout.displayed(), ["a", "c", "d"]);
        layout.toggle("b", true, 1);
        assert_eq!(layout.displayed(), ["a", "b", "c", "d"]);

        // Hiding two columns first makes the drift visible: c's declared
        // position 2 now points past b's old slot.
        let mut layout = layout_of(&["a", "b", "c", "d"]);
        layout.toggle("a", false, 0);
        layout.toggle("b", false, 1);
        assert_eq!(layout.displayed(), ["c", "d"]);
        layout.toggle("b", true, 1);
        assert_eq!(layout.displayed(), ["c", "b", "d"]);
    }

    proptest! {
        // Driving the layout through the panel (each op flips one entry's
        // active flag) and finishing with every column active must always
        // restore the full name set, whatever order it ends up in.
        #[test]
        fn all_active_sequences_restore_the_full_set(ops in proptest::collection::vec(0usize..6, 0..32)) {
            let mut layout = ColumnLayout::new();
            let mut entries = toggle_entries();
            for op in ops {
                let (name, active, position) = {
                    let entry = &mut entries[op];
                    entry.active = !entry.active;
                    (entry.name.clone(), entry.active, entry.position)
                };
                layout.toggle(&name, active, position);
            }
            for entry in entries.iter_mut().filter(|e| !e.active) {
                entry.active = true;
                layout.toggle(&entry.name, true, entry.position);
            }

            let mut shown: Vec<&str> = layout.displayed().iter().map(String::as_str).collect();
            shown.sort_unstable();
            let mut expected: Vec<&str> = COLUMNS.iter().map(|c| c.name).collect();
            expected.sort_unstable();
            prop_assert_eq!(shown, expected);
        }
    }
}
