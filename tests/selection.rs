use geostamp::catalog::Catalog;
use geostamp::selection::SelectionTracker;
use geostamp::session::Session;

mod common;
use common::ids;

fn catalog_of(paths: &[&str]) -> Catalog {
    let mut catalog = Catalog::new();
    catalog.add(paths.iter().copied());
    catalog
}

#[test]
fn toggle_flips_membership() {
    let catalog = catalog_of(&["a", "b"]);
    let mut selection = SelectionTracker::new();
    selection.toggle("a", &catalog);
    assert!(selection.contains("a"));
    selection.toggle("a", &catalog);
    assert!(selection.is_empty());
    assert_eq!(selection.revision(), 2);
}

#[test]
fn toggle_ignores_ids_outside_catalog() {
    let catalog = catalog_of(&["a"]);
    let mut selection = SelectionTracker::new();
    selection.toggle("ghost", &catalog);
    assert!(selection.is_empty());
    assert_eq!(selection.revision(), 0);
}

#[test]
fn toggle_all_goes_all_then_none() {
    let catalog = catalog_of(&["a", "b", "c"]);
    let mut selection = SelectionTracker::new();
    selection.toggle("b", &catalog);

    selection.toggle_all(&catalog);
    assert_eq!(selection.ids(), &ids(&["a", "b", "c"]));
    selection.toggle_all(&catalog);
    assert!(selection.is_empty());
    selection.toggle_all(&catalog);
    assert_eq!(selection.len(), 3);
}

#[test]
fn toggle_all_on_empty_catalog_stays_empty() {
    let catalog = Catalog::new();
    let mut selection = SelectionTracker::new();
    selection.toggle_all(&catalog);
    assert!(selection.is_empty());
}

#[test]
fn reconcile_prunes_removed_ids() {
    let mut catalog = catalog_of(&["a", "b", "c"]);
    let mut selection = SelectionTracker::new();
    selection.toggle("a", &catalog);
    selection.toggle("c", &catalog);
    catalog.remove(&ids(&["c"]));

    assert!(selection.reconcile(&catalog));
    assert_eq!(selection.ids(), &ids(&["a"]));
}

#[test]
fn reconcile_without_pruning_keeps_revision() {
    let mut catalog = catalog_of(&["a", "b"]);
    let mut selection = SelectionTracker::new();
    selection.toggle("a", &catalog);
    let revision = selection.revision();
    catalog.remove(&ids(&["b"]));

    assert!(!selection.reconcile(&catalog));
    assert_eq!(selection.revision(), revision);
}

#[test]
fn reconcile_on_empty_catalog_always_emits_empty() {
    let catalog = Catalog::new();
    let mut selection = SelectionTracker::new();
    assert!(selection.reconcile(&catalog));
    assert!(selection.is_empty());
    assert_eq!(selection.revision(), 1);
}

#[test]
fn targets_follow_catalog_order() {
    let catalog = catalog_of(&["c", "a", "b"]);
    let mut selection = SelectionTracker::new();
    selection.toggle("b", &catalog);
    selection.toggle("c", &catalog);
    assert_eq!(selection.targets(&catalog), ["c", "b"]);
}

#[test]
fn session_keeps_selection_inside_catalog() {
    let mut session = Session::new();
    session.add_paths(["a", "b", "c"]);
    session.toggle_all();
    session.remove(&ids(&["b"]));
    assert_eq!(session.selection().ids(), &ids(&["a", "c"]));
    assert!(session
        .selection()
        .ids()
        .iter()
        .all(|id| session.catalog().contains(id)));

    session.clear();
    assert!(session.selection().is_empty());
    assert_eq!(session.viewport.len(), 0);
}

#[test]
fn remove_selected_drops_exactly_the_selection() {
    let mut session = Session::new();
    session.add_paths(["a", "b", "c"]);
    session.toggle("a");
    session.toggle("c");
    session.remove_selected();
    assert_eq!(session.catalog().len(), 1);
    assert!(session.catalog().contains("b"));
    assert!(session.selection().is_empty());
}

/// Deterministic xorshift so the step sequence is reproducible.
struct Steps(u64);

impl Steps {
    fn next(&mut self, below: u64) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0 % below
    }
}

#[test]
fn selection_stays_inside_catalog_over_random_steps() {
    for seed in [1u64, 7, 42, 0x5eed, 0xdead_beef] {
        let mut steps = Steps(seed);
        let mut session = Session::new();
        for step in 0..400 {
            let id = format!("/img/{}.jpg", steps.next(12));
            match steps.next(7) {
                0 | 1 => {
                    session.add_paths([id]);
                }
                2 => {
                    session.remove(&ids(&[id.as_str()]));
                }
                3 | 4 => session.toggle(&id),
                5 => session.toggle_all(),
                _ => {
                    if steps.next(4) == 0 {
                        session.clear();
                    } else {
                        session.remove_selected();
                    }
                }
            }

            let catalog = session.catalog();
            assert!(
                session.selection().ids().iter().all(|id| catalog.contains(id)),
                "seed {seed} step {step}: selection escaped the catalog"
            );
            assert!(session.selection().len() <= catalog.len());
            if catalog.is_empty() {
                assert!(session.selection().is_empty());
            }
            assert_eq!(session.viewport.len(), catalog.len());
        }
    }
}
