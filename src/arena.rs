/// Slot storage for mesh elements. Deleting an element leaves a vacant slot
/// behind and pushes its index onto the free list, so the indices of the
/// surviving elements never move. New elements fill vacant slots before the
/// storage grows.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<u32>,
    count: usize,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
            count: 0,
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Arena {
            slots: Vec::with_capacity(n),
            free: Vec::new(),
            count: 0,
        }
    }

    /// The number of live elements.
    pub fn len(&self) -> usize {
        self.count
    }

    /// The number of slots, live and vacant. Indices handed out so far are
    /// all below this.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn insert(&mut self, val: T) -> u32 {
        self.count += 1;
        match self.free.pop() {
            Some(i) => {
                debug_assert!(self.slots[i as usize].is_none());
                self.slots[i as usize] = Some(val);
                i
            }
            None => {
                let i = self.slots.len() as u32;
                self.slots.push(Some(val));
                i
            }
        }
    }

    pub fn remove(&mut self, i: u32) -> T {
        let val = match self.slots[i as usize].take() {
            Some(val) => val,
            None => panic!("removing a dead element at index {}", i),
        };
        self.free.push(i);
        self.count -= 1;
        val
    }

    pub fn get(&self, i: u32) -> &T {
        match &self.slots[i as usize] {
            Some(val) => val,
            None => panic!("accessing a dead element at index {}", i),
        }
    }

    pub fn get_mut(&mut self, i: u32) -> &mut T {
        match &mut self.slots[i as usize] {
            Some(val) => val,
            None => panic!("accessing a dead element at index {}", i),
        }
    }

    pub fn contains(&self, i: u32) -> bool {
        (i as usize) < self.slots.len() && self.slots[i as usize].is_some()
    }

    /// Iterate over the indices of live elements in increasing order.
    pub fn indices(&self) -> impl Iterator<Item = u32> + use<'_, T> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| i as u32))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.count = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
