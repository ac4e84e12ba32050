#![no_main]

use ferrous_lifecycle::{dispose_fn, SingletonRegistry};
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

const NAMES: u8 = 8;

fuzz_target!(|data: &[u8]| {
    let registry = SingletonRegistry::new();
    let destroyed = Arc::new(Mutex::new(Vec::new()));

    for name in 0..NAMES {
        let log = destroyed.clone();
        registry.register_disposable(
            name.to_string(),
            Arc::new(dispose_fn(move || {
                log.lock().unwrap().push(name);
                Ok(())
            })),
        );
    }

    // Each op is three bytes: opcode, first name, second name
    for op in data.chunks_exact(3) {
        let a = (op[1] % NAMES).to_string();
        let b = (op[2] % NAMES).to_string();
        match op[0] % 4 {
            0 => registry.register_dependent(&a, &b),
            1 => registry.register_contained(&a, &b),
            2 => {
                // Queries must terminate whatever cycles exist
                let _ = registry.is_dependent(&a, &b);
                let _ = registry.dependents_of(&a);
                let _ = registry.dependencies_of(&b);
            }
            _ => registry.destroy_singleton(&a),
        }
    }

    registry.destroy_singletons();

    let destroyed = destroyed.lock().unwrap();
    let unique: HashSet<_> = destroyed.iter().collect();
    assert_eq!(unique.len(), destroyed.len(), "instance destroyed twice");
    assert_eq!(destroyed.len(), NAMES as usize);
    assert!(!registry.has_dependents("0"));
});
