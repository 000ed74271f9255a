use std::sync::Mutex;

/// Mutex-serialized boolean (spec §4.5).
///
/// Every access goes through the mutex rather than `AtomicBool`'s lock-free ops: the
/// spec asks for simple, uniform locking semantics across all of these containers,
/// not per-primitive lock-free tricks.
#[derive(Debug, Default)]
pub struct AtomicBool {
    value: Mutex<bool>,
}

impl AtomicBool {
    pub fn new(initial: bool) -> Self {
        AtomicBool {
            value: Mutex::new(initial),
        }
    }

    pub fn get(&self) -> bool {
        *self.value.lock().expect("AtomicBool mutex poisoned")
    }

    pub fn set(&self, value: bool) {
        *self.value.lock().expect("AtomicBool mutex poisoned") = value;
    }

    pub fn update<F: FnOnce(bool) -> bool>(&self, f: F) {
        let mut guard = self.value.lock().expect("AtomicBool mutex poisoned");
        *guard = f(*guard);
    }
}

/// Mutex-serialized integer counter (spec §4.5).
#[derive(Debug, Default)]
pub struct AtomicInt {
    value: Mutex<i64>,
}

impl AtomicInt {
    pub fn new(initial: i64) -> Self {
        AtomicInt {
            value: Mutex::new(initial),
        }
    }

    pub fn get(&self) -> i64 {
        *self.value.lock().expect("AtomicInt mutex poisoned")
    }

    pub fn set(&self, value: i64) {
        *self.value.lock().expect("AtomicInt mutex poisoned") = value;
    }

    pub fn update<F: FnOnce(i64) -> i64>(&self, f: F) {
        let mut guard = self.value.lock().expect("AtomicInt mutex poisoned");
        *guard = f(*guard);
    }

    pub fn increment(&self) -> i64 {
        let mut guard = self.value.lock().expect("AtomicInt mutex poisoned");
        *guard += 1;
        *guard
    }
}

/// A value that may be set exactly once; later `set` calls are ignored (spec §4.5).
#[derive(Debug, Default)]
pub struct AtomicOnce<T> {
    value: Mutex<Option<T>>,
}

impl<T: Clone> AtomicOnce<T> {
    pub fn new() -> Self {
        AtomicOnce {
            value: Mutex::new(None),
        }
    }

    pub fn get(&self) -> Option<T> {
        self.value.lock().expect("AtomicOnce mutex poisoned").clone()
    }

    /// Returns `true` if this call was the one that set the value.
    pub fn set(&self, value: T) -> bool {
        let mut guard = self.value.lock().expect("AtomicOnce mutex poisoned");
        if guard.is_some() {
            return false;
        }
        *guard = Some(value);
        true
    }
}

/// Mutex-guarded growable array (spec §4.5).
#[derive(Debug, Default)]
pub struct AtomicArray<T> {
    values: Mutex<Vec<T>>,
}

impl<T: Clone> AtomicArray<T> {
    pub fn new() -> Self {
        AtomicArray {
            values: Mutex::new(Vec::new()),
        }
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.values
            .lock()
            .expect("AtomicArray mutex poisoned")
            .get(index)
            .cloned()
    }

    pub fn set(&self, index: usize, value: T) {
        let mut guard = self.values.lock().expect("AtomicArray mutex poisoned");
        if index < guard.len() {
            guard[index] = value;
        }
    }

    pub fn push(&self, value: T) {
        self.values.lock().expect("AtomicArray mutex poisoned").push(value);
    }

    pub fn update<F: FnOnce(&mut Vec<T>)>(&self, f: F) {
        let mut guard = self.values.lock().expect("AtomicArray mutex poisoned");
        f(&mut guard);
    }

    pub fn len(&self) -> usize {
        self.values.lock().expect("AtomicArray mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.values.lock().expect("AtomicArray mutex poisoned").clone()
    }

    /// Holds the lock for the duration of `f`. Callers MUST NOT re-enter this container
    /// from inside the callback (spec §4.5).
    pub fn for_each<F: FnMut(&T)>(&self, mut f: F) {
        let guard = self.values.lock().expect("AtomicArray mutex poisoned");
        for item in guard.iter() {
            f(item);
        }
    }
}

/// Mutex-guarded key/value map (spec §4.5).
#[derive(Debug, Default)]
pub struct AtomicMap<K, V> {
    entries: Mutex<std::collections::HashMap<K, V>>,
}

impl<K: std::hash::Hash + Eq + Clone, V: Clone> AtomicMap<K, V> {
    pub fn new() -> Self {
        AtomicMap {
            entries: Mutex::new(std::collections::HashMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries
            .lock()
            .expect("AtomicMap mutex poisoned")
            .get(key)
            .cloned()
    }

    pub fn set(&self, key: K, value: V) {
        self.entries.lock().expect("AtomicMap mutex poisoned").insert(key, value);
    }

    pub fn update<F: FnOnce(&mut std::collections::HashMap<K, V>)>(&self, f: F) {
        let mut guard = self.entries.lock().expect("AtomicMap mutex poisoned");
        f(&mut guard);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("AtomicMap mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Holds the lock for the duration of `f`. Callers MUST NOT re-enter this container
    /// from inside the callback (spec §4.5).
    pub fn for_each<F: FnMut(&K, &V)>(&self, mut f: F) {
        let guard = self.entries.lock().expect("AtomicMap mutex poisoned");
        for (k, v) in guard.iter() {
            f(k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_round_trips() {
        let b = AtomicBool::new(false);
        assert!(!b.get());
        b.set(true);
        assert!(b.get());
        b.update(|v| !v);
        assert!(!b.get());
    }

    #[test]
    fn int_increments() {
        let i = AtomicInt::new(0);
        assert_eq!(i.increment(), 1);
        assert_eq!(i.increment(), 2);
        assert_eq!(i.get(), 2);
    }

    #[test]
    fn once_sets_exactly_once() {
        let once: AtomicOnce<u32> = AtomicOnce::new();
        assert!(once.set(1));
        assert!(!once.set(2));
        assert_eq!(once.get(), Some(1));
    }

    #[test]
    fn array_push_and_snapshot() {
        let arr: AtomicArray<i32> = AtomicArray::new();
        arr.push(1);
        arr.push(2);
        assert_eq!(arr.snapshot(), vec![1, 2]);
    }

    #[test]
    fn map_set_and_get() {
        let map: AtomicMap<String, i32> = AtomicMap::new();
        map.set("a".to_string(), 1);
        assert_eq!(map.get(&"a".to_string()), Some(1));
        assert_eq!(map.get(&"b".to_string()), None);
    }
}
