//! Minimal dependency tracking for the dashboard.
//!
//! Widgets write [`Input`]s, which bump a version stamp whenever their value
//! actually changes. A [`Calc`] caches one derived value together with the
//! stamps it was computed from; refreshing it with an unchanged key is free,
//! while a changed key recomputes synchronously and bumps the calc's own
//! revision so downstream calcs can key on it in turn.

/// Monotonic change counter handed out by inputs and calcs.
pub type Version = u64;

// ---------------------------------------------------------------------------
// Input – a widget-owned value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Input<T> {
    value: T,
    version: Version,
}

impl<T: Clone + PartialEq> Input<T> {
    pub fn new(value: T) -> Self {
        Input { value, version: 0 }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Store a new value. Returns `false` (and keeps the version) when the
    /// value is unchanged.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.version += 1;
        true
    }

    /// Edit a copy of the value and store it through [`Input::set`].
    pub fn update(&mut self, edit: impl FnOnce(&mut T)) -> bool {
        let mut next = self.value.clone();
        edit(&mut next);
        self.set(next)
    }
}

// ---------------------------------------------------------------------------
// Calc – a memoised derived value
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Calc<K, V> {
    name: &'static str,
    key: Option<K>,
    value: Option<V>,
    revision: Version,
}

impl<K: PartialEq, V> Calc<K, V> {
    pub fn new(name: &'static str) -> Self {
        Calc {
            name,
            key: None,
            value: None,
            revision: 0,
        }
    }

    /// Recompute when `key` differs from the key of the cached value.
    /// Returns whether a recomputation happened.
    pub fn refresh(&mut self, key: K, compute: impl FnOnce() -> V) -> bool {
        if self.value.is_some() && self.key.as_ref() == Some(&key) {
            return false;
        }
        log::debug!("recomputing {} (revision {})", self.name, self.revision + 1);
        self.value = Some(compute());
        self.key = Some(key);
        self.revision += 1;
        true
    }

    pub fn get(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// How many times the value has been computed; downstream calcs key on it.
    pub fn revision(&self) -> Version {
        self.revision
    }
}

// ---------------------------------------------------------------------------
// Phase – what the pipeline is doing right now
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Showing the last computed views.
    #[default]
    Idle,
    /// Inside a synchronous refresh.
    Recomputing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_version_only_moves_on_change() {
        let mut input = Input::new(5);
        assert_eq!(input.version(), 0);
        assert!(!input.set(5));
        assert_eq!(input.version(), 0);
        assert!(input.set(6));
        assert_eq!(input.version(), 1);
        assert!(input.update(|v| *v += 1));
        assert_eq!((*input.get(), input.version()), (7, 2));
        assert!(!input.update(|_| {}));
    }

    #[test]
    fn calc_reuses_value_for_same_key() {
        let mut runs = 0;
        let mut calc: Calc<Version, usize> = Calc::new("double");

        assert!(calc.refresh(0, || {
            runs += 1;
            2
        }));
        assert!(!calc.refresh(0, || {
            runs += 1;
            999
        }));
        assert_eq!(runs, 1);
        assert_eq!(calc.get(), Some(&2));
        assert_eq!(calc.revision(), 1);
    }

    #[test]
    fn calc_recomputes_once_per_key_change() {
        let mut input = Input::new(3usize);
        let mut doubled: Calc<Version, usize> = Calc::new("doubled");
        let mut plus_one: Calc<Version, usize> = Calc::new("plus_one");

        fn step(input: &Input<usize>, doubled: &mut Calc<Version, usize>, plus_one: &mut Calc<Version, usize>) {
            doubled.refresh(input.version(), || input.get() * 2);
            let d = *doubled.get().unwrap();
            plus_one.refresh(doubled.revision(), || d + 1);
        }

        step(&input, &mut doubled, &mut plus_one);
        assert_eq!(plus_one.get(), Some(&7));
        assert_eq!((doubled.revision(), plus_one.revision()), (1, 1));

        step(&input, &mut doubled, &mut plus_one);
        assert_eq!((doubled.revision(), plus_one.revision()), (1, 1));

        input.set(10);
        step(&input, &mut doubled, &mut plus_one);
        assert_eq!(plus_one.get(), Some(&21));
        assert_eq!((doubled.revision(), plus_one.revision()), (2, 2));
    }
}
