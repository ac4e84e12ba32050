use ferrous_lifecycle::{
    dispose_fn, instance, BoxError, Dispose, LifecycleObserver, RegistryError, SingletonRegistry,
};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

struct Recorded {
    name: &'static str,
    order: Log,
}

impl Dispose for Recorded {
    fn dispose(&self) -> Result<(), BoxError> {
        self.order.lock().unwrap().push(self.name.to_string());
        Ok(())
    }
}

fn recorded(registry: &SingletonRegistry, name: &'static str, order: &Log) {
    registry.register_singleton(name, instance(name)).unwrap();
    registry.register_disposable(name, Arc::new(Recorded { name, order: order.clone() }));
}

fn destroyed(order: &Log) -> Vec<String> {
    order.lock().unwrap().clone()
}

#[test]
fn test_disposal_reverse_registration_order() {
    let order = Log::default();
    let registry = SingletonRegistry::new();
    recorded(&registry, "First", &order);
    recorded(&registry, "Second", &order);
    recorded(&registry, "Third", &order);

    registry.destroy_singletons();

    assert_eq!(destroyed(&order), vec!["Third", "Second", "First"]);
    assert_eq!(registry.singleton_count(), 0);
}

#[test]
fn test_dependents_destroyed_before_dependency() {
    let order = Log::default();
    let registry = SingletonRegistry::new();
    // Registered after its dependent, so plain reverse order would destroy it first
    recorded(&registry, "repository", &order);
    recorded(&registry, "database", &order);
    registry.register_dependent("database", "repository");

    registry.destroy_singletons();

    assert_eq!(destroyed(&order), vec!["repository", "database"]);
}

#[test]
fn test_transitive_dependents_destroyed_first() {
    let order = Log::default();
    let registry = SingletonRegistry::new();
    recorded(&registry, "controller", &order);
    recorded(&registry, "service", &order);
    recorded(&registry, "database", &order);
    registry.register_dependent("database", "service");
    registry.register_dependent("service", "controller");

    registry.destroy_singleton("database");

    assert_eq!(destroyed(&order), vec!["controller", "service", "database"]);
    assert!(!registry.contains_singleton("controller"));
    assert!(!registry.has_dependents("database"));
    assert!(registry.dependencies_of("service").is_empty());
}

#[test]
fn test_containing_instance_destroys_contained_afterwards() {
    let order = Log::default();
    let registry = SingletonRegistry::new();
    recorded(&registry, "inner", &order);
    recorded(&registry, "outer", &order);
    registry.register_contained("inner", "outer");

    // The owner depends on what it contains
    assert_eq!(registry.dependents_of("inner"), vec!["outer"]);

    registry.destroy_singleton("outer");

    assert_eq!(destroyed(&order), vec!["outer", "inner"]);
    assert!(!registry.contains_singleton("inner"));
}

#[test]
fn test_containment_with_consistent_dependency_destroys_inner_first() {
    let order = Log::default();
    let registry = SingletonRegistry::new();
    // The inner instance finishes, and registers its destroy action, before its owner
    recorded(&registry, "inner", &order);
    recorded(&registry, "outer", &order);
    registry.register_contained("inner", "outer");
    registry.register_dependent("outer", "inner");

    registry.destroy_singletons();

    assert_eq!(destroyed(&order), vec!["inner", "outer"]);
}

#[test]
fn test_each_instance_destroyed_once() {
    let order = Log::default();
    let registry = SingletonRegistry::new();
    recorded(&registry, "a", &order);
    recorded(&registry, "b", &order);
    recorded(&registry, "c", &order);
    registry.register_dependent("a", "b");
    registry.register_dependent("a", "c");
    registry.register_dependent("b", "c");
    registry.register_dependent("c", "a"); // pre-existing cycle

    registry.destroy_singletons();

    let mut names = destroyed(&order);
    assert_eq!(names.len(), 3);
    names.sort();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_failing_dispose_does_not_abort_teardown() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let order = Log::default();
    let registry = SingletonRegistry::new();
    recorded(&registry, "survivor", &order);
    registry.register_disposable("erroring", Arc::new(dispose_fn(|| Err("disk full".into()))));
    registry.register_disposable("panicking", Arc::new(dispose_fn(|| panic!("dispose exploded"))));

    registry.destroy_singletons();

    assert_eq!(destroyed(&order), vec!["survivor"]);
    assert!(!registry.is_in_destruction());
}

#[test]
fn test_observer_sees_destroy_failures() {
    #[derive(Default)]
    struct FailureObserver {
        destroying: Mutex<Vec<String>>,
        failures: Mutex<Vec<(String, String)>>,
    }

    impl LifecycleObserver for FailureObserver {
        fn destroying(&self, name: &str) {
            self.destroying.lock().unwrap().push(name.to_string());
        }

        fn destroy_failed(&self, name: &str, message: &str) {
            self.failures.lock().unwrap().push((name.to_string(), message.to_string()));
        }
    }

    let observer = Arc::new(FailureObserver::default());
    let registry = SingletonRegistry::builder().observer(observer.clone()).build();
    registry.register_disposable("ok", Arc::new(dispose_fn(|| Ok(()))));
    registry.register_disposable("broken", Arc::new(dispose_fn(|| Err("socket closed".into()))));

    registry.destroy_singletons();

    assert_eq!(*observer.destroying.lock().unwrap(), vec!["broken", "ok"]);
    assert_eq!(
        *observer.failures.lock().unwrap(),
        vec![("broken".to_string(), "socket closed".to_string())]
    );
}

#[test]
fn test_creation_not_allowed_during_teardown() {
    let registry = Arc::new(SingletonRegistry::new());
    let attempt: Arc<Mutex<Option<Result<(), String>>>> = Arc::default();

    let weak = Arc::downgrade(&registry);
    let outcome = attempt.clone();
    registry.register_disposable(
        "greedy",
        Arc::new(dispose_fn(move || {
            if let Some(registry) = weak.upgrade() {
                let result = registry
                    .get_or_create("late", || Ok(instance(())))
                    .map(|_| ())
                    .map_err(|e| match e {
                        RegistryError::CreationNotAllowed(name) => name,
                        other => other.to_string(),
                    });
                *outcome.lock().unwrap() = Some(result);
            }
            Ok(())
        })),
    );

    registry.destroy_singletons();

    assert_eq!(*attempt.lock().unwrap(), Some(Err("late".to_string())));
    // Teardown finished: creation works again
    assert!(registry.get_or_create("late", || Ok(instance(()))).is_ok());
}

#[test]
fn test_destroy_all_clears_graph_and_cache() {
    let registry = SingletonRegistry::new();
    registry.register_singleton("a", instance(())).unwrap();
    registry.add_singleton_factory("b", || instance(()));
    registry.register_dependent("a", "b");
    registry.register_contained("c", "a");

    registry.destroy_singletons();

    assert_eq!(registry.singleton_count(), 0);
    assert!(!registry.has_dependents("a"));
    assert!(!registry.has_dependents("c"));
    assert!(registry.dependencies_of("b").is_empty());
}

#[test]
fn test_destroy_instance_without_handle() {
    let order = Log::default();
    let registry = SingletonRegistry::new();
    recorded(&registry, "dependent", &order);
    registry.register_dependent("target", "dependent");

    registry.destroy_instance("target", None);

    assert_eq!(destroyed(&order), vec!["dependent"]);
}
