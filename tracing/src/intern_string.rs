//! Process-lifetime string storage and host-interned string resolution
use std::{collections::HashMap, collections::HashSet, sync::Mutex};

lazy_static! {
    static ref LOCKED_HASH: Mutex<HashSet<String>> = Mutex::new(HashSet::new());
}

/// Copies the string into a process-lifetime set, yielding a stable address
/// usable as a wire identity.
pub fn intern_string(input: &str) -> &'static str {
    let mut lock = LOCKED_HASH.lock().unwrap();
    if let Some(val) = lock.get(input) {
        unsafe { std::mem::transmute::<&str, &'static str>(val) }
    } else {
        lock.insert(input.to_string());
        let interned = lock.get(input).unwrap();
        unsafe { std::mem::transmute::<&str, &'static str>(interned) }
    }
}

/// Resolves the identities of strings interned by the host (engine name
/// tables, runtime string registries). `None` means the handle was never
/// registered.
pub type HostStringResolver = fn(u64) -> Option<String>;

lazy_static! {
    static ref HOST_RESOLVER: Mutex<Option<HostStringResolver>> = Mutex::new(None);
    static ref RESOLVED_CACHE: Mutex<HashMap<u64, &'static str>> = Mutex::new(HashMap::new());
}

pub fn set_host_string_resolver(resolver: HostStringResolver) {
    *HOST_RESOLVER.lock().unwrap() = Some(resolver);
}

/// Materializes the bytes of a host-interned string; called when extracting
/// block dependencies, off the emission path.
pub fn resolve_host_string(id: u64) -> Option<&'static str> {
    if let Some(cached) = RESOLVED_CACHE.lock().unwrap().get(&id) {
        return Some(cached);
    }
    let resolver = (*HOST_RESOLVER.lock().unwrap())?;
    let resolved = intern_string(&resolver(id)?);
    RESOLVED_CACHE.lock().unwrap().insert(id, resolved);
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::intern_string;

    #[test]
    fn test_intern_identity() {
        let first = intern_string("alpha");
        let second = intern_string(&String::from("alpha"));
        assert_eq!(first.as_ptr(), second.as_ptr());
        assert_ne!(first.as_ptr(), intern_string("beta").as_ptr());
    }
}
