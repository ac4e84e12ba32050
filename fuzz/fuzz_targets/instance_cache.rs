#![no_main]

use ferrous_lifecycle::{instance, SingletonRegistry};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

const NAMES: u8 = 6;

fuzz_target!(|data: &[u8]| {
    let registry = SingletonRegistry::new();

    for op in data.chunks_exact(2) {
        let name = (op[1] % NAMES).to_string();
        match op[0] % 5 {
            0 => {
                let _ = registry.register_singleton(&name, instance(op[1]));
            }
            1 => {
                let raw = instance(op[1]);
                let early = raw.clone();
                let created = registry.get_or_create(&name, || {
                    registry.add_singleton_factory(&name, move || early);
                    let seen = registry.get_singleton(&name);
                    assert!(seen.is_some());
                    Ok(raw.clone())
                });
                if let Ok(created) = created {
                    let again = registry.get_singleton(&name).unwrap();
                    assert!(Arc::ptr_eq(&created, &again));
                }
            }
            2 => {
                let _ = registry.get_or_create(&name, || Err("refused".into()));
            }
            3 => registry.remove_singleton(&name),
            _ => {
                // Nothing is in creation between operations
                assert!(!registry.is_currently_in_creation(&name));
            }
        }
    }

    assert!(registry.singleton_count() <= NAMES as usize);
});
