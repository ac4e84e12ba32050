use ferrous_lifecycle::{AliasResolver, SimpleAliasRegistry, SingletonRegistry};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[test]
fn test_transitive_dependency_detected() {
    let registry = SingletonRegistry::new();
    // z depends on y, y depends on x
    registry.register_dependent("y", "z");
    registry.register_dependent("x", "y");

    assert!(registry.is_dependent("x", "z"));
    assert!(registry.is_dependent("x", "y"));
    assert!(!registry.is_dependent("z", "x"));
    assert!(!registry.is_dependent("x", "unrelated"));
}

#[test]
fn test_query_terminates_with_unrelated_cycle() {
    let registry = SingletonRegistry::new();
    registry.register_dependent("q", "p");
    registry.register_dependent("p", "q");
    registry.register_dependent("x", "p");

    assert!(registry.is_dependent("x", "q"));
    assert!(!registry.is_dependent("x", "nowhere"));
    assert!(!registry.is_dependent("p", "x"));
}

#[test]
fn test_duplicate_dependency_registration_is_idempotent() {
    let registry = SingletonRegistry::new();
    registry.register_dependent("d", "n");
    registry.register_dependent("d", "n");

    assert_eq!(registry.dependents_of("d"), vec!["n"]);
    assert_eq!(registry.dependencies_of("n"), vec!["d"]);
    assert!(registry.has_dependents("d"));
    assert!(!registry.has_dependents("n"));
}

#[test]
fn test_unknown_names_have_empty_edges() {
    let registry = SingletonRegistry::new();
    assert!(registry.dependents_of("ghost").is_empty());
    assert!(registry.dependencies_of("ghost").is_empty());
    assert!(!registry.has_dependents("ghost"));
}

#[test]
fn test_dependency_recorded_under_canonical_name() {
    let aliases = Arc::new(SimpleAliasRegistry::new());
    aliases.register_alias("dataSource", "db").unwrap();
    let registry = SingletonRegistry::builder().aliases(aliases.clone()).build();

    registry.register_dependent("db", "repository");

    assert_eq!(registry.dependents_of("dataSource"), vec!["repository"]);
    assert!(registry.dependents_of("db").is_empty());
    assert_eq!(registry.dependencies_of("repository"), vec!["dataSource"]);
    // Queries canonicalize too
    assert!(registry.is_dependent("db", "repository"));
    assert_eq!(aliases.canonical_name("db"), registry.canonical_name("db"));
}

/// Reference answer: breadth-first reachability over the reverse index.
fn reachable(edges: &[(u8, u8)], from: u8, target: u8) -> bool {
    let mut dependents: HashMap<u8, Vec<u8>> = HashMap::new();
    for &(dependency, dependent) in edges {
        dependents.entry(dependency).or_default().push(dependent);
    }
    let mut seen = HashSet::new();
    let mut queue = vec![from];
    while let Some(current) = queue.pop() {
        for &next in dependents.get(&current).into_iter().flatten() {
            if next == target {
                return true;
            }
            if seen.insert(next) {
                queue.push(next);
            }
        }
    }
    false
}

proptest! {
    #[test]
    fn transitive_query_matches_reachability(
        edges in prop::collection::vec((0u8..8, 0u8..8), 0..24),
        from in 0u8..8,
        target in 0u8..8,
    ) {
        let registry = SingletonRegistry::new();
        for (dependency, dependent) in &edges {
            registry.register_dependent(&dependency.to_string(), &dependent.to_string());
        }

        prop_assert_eq!(
            registry.is_dependent(&from.to_string(), &target.to_string()),
            reachable(&edges, from, target)
        );
    }

    #[test]
    fn dependent_sets_have_no_duplicates(
        edges in prop::collection::vec((0u8..4, 0u8..4), 0..32),
    ) {
        let registry = SingletonRegistry::new();
        for (dependency, dependent) in &edges {
            registry.register_dependent(&dependency.to_string(), &dependent.to_string());
        }

        for name in 0u8..4 {
            let dependents = registry.dependents_of(&name.to_string());
            let unique: HashSet<_> = dependents.iter().collect();
            prop_assert_eq!(unique.len(), dependents.len());
        }
    }

    #[test]
    fn teardown_destroys_every_record_once(
        edges in prop::collection::vec((0u8..6, 0u8..6), 0..20),
    ) {
        use ferrous_lifecycle::dispose_fn;
        use std::sync::Mutex;

        let destroyed = Arc::new(Mutex::new(Vec::new()));
        let registry = SingletonRegistry::new();
        for name in 0u8..6 {
            let log = destroyed.clone();
            registry.register_disposable(
                name.to_string(),
                Arc::new(dispose_fn(move || {
                    log.lock().unwrap().push(name);
                    Ok(())
                })),
            );
        }
        for (dependency, dependent) in &edges {
            registry.register_dependent(&dependency.to_string(), &dependent.to_string());
        }

        registry.destroy_singletons();

        let mut names = destroyed.lock().unwrap().clone();
        names.sort();
        prop_assert_eq!(names, (0u8..6).collect::<Vec<_>>());
    }
}
