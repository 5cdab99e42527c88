use slotmap::{Key, SlotMap};

/// Intrusive next/previous links embedded in every ring member.
///
/// Null keys mean "not linked". Links are only ever rewired by [`Ring`];
/// entity code just stores the link and hands out references via
/// [`Linked`].
#[derive(Debug, Clone, Copy)]
pub struct Link<K: Key> {
    next: K,
    prev: K,
}

impl<K: Key> Default for Link<K> {
    fn default() -> Self {
        Self {
            next: K::null(),
            prev: K::null(),
        }
    }
}

impl<K: Key> Link<K> {
    /// The next member in ring order, or a null key when unlinked.
    #[must_use]
    pub fn next(&self) -> K {
        self.next
    }

    /// The previous member in ring order, or a null key when unlinked.
    #[must_use]
    pub fn prev(&self) -> K {
        self.prev
    }
}

/// Implemented by arena records that participate in a [`Ring`].
pub trait Linked<K: Key> {
    fn link(&self) -> &Link<K>;
    fn link_mut(&mut self) -> &mut Link<K>;
}

/// A doubly-linked cyclic list over arena-allocated records.
///
/// The ring stores only a head key and a length; the links live inside
/// the members themselves, so structural edits never invalidate
/// external handles. Insert, remove and replace are O(1) in the number
/// of untouched members.
///
/// All operations assume caller-enforced preconditions (the anchor is a
/// member, inserted runs are not), checked by `debug_assert!` only.
#[derive(Debug, Clone)]
pub struct Ring<K: Key> {
    first: Option<K>,
    len: usize,
}

impl<K: Key> Default for Ring<K> {
    fn default() -> Self {
        Self {
            first: None,
            len: 0,
        }
    }
}

impl<K: Key> Ring<K> {
    /// Creates an empty ring.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The head member (first in iteration order), if any.
    #[must_use]
    pub fn first(&self) -> Option<K> {
        self.first
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the ring has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `element` at the end of the iteration order.
    pub fn push_back<T: Linked<K>>(&mut self, arena: &mut SlotMap<K, T>, element: K) {
        match self.first {
            None => {
                let link = arena[element].link_mut();
                link.next = element;
                link.prev = element;
                self.first = Some(element);
                self.len = 1;
            }
            Some(first) => self.insert_before(arena, first, element, 1),
        }
    }

    /// Splices a run of `count` elements, chained through their own
    /// `next` links and starting at `element`, immediately before
    /// `anchor`. The head is unchanged.
    pub fn insert_before<T: Linked<K>>(
        &mut self,
        arena: &mut SlotMap<K, T>,
        anchor: K,
        element: K,
        count: usize,
    ) {
        debug_assert!(count >= 1);
        debug_assert!(!self.is_empty(), "anchor must be a member");
        let run_last = advance(arena, element, count - 1);
        let before = arena[anchor].link().prev;
        arena[before].link_mut().next = element;
        arena[element].link_mut().prev = before;
        arena[run_last].link_mut().next = anchor;
        arena[anchor].link_mut().prev = run_last;
        self.len += count;
    }

    /// Splices a run of `count` elements starting at `element`
    /// immediately after `anchor`. The head is unchanged.
    pub fn insert_after<T: Linked<K>>(
        &mut self,
        arena: &mut SlotMap<K, T>,
        anchor: K,
        element: K,
        count: usize,
    ) {
        debug_assert!(count >= 1);
        debug_assert!(!self.is_empty(), "anchor must be a member");
        let run_last = advance(arena, element, count - 1);
        let after = arena[anchor].link().next;
        arena[anchor].link_mut().next = element;
        arena[element].link_mut().prev = anchor;
        arena[run_last].link_mut().next = after;
        arena[after].link_mut().prev = run_last;
        self.len += count;
    }

    /// Detaches the closed run `[from, to]` of length `count`.
    ///
    /// Removed elements keep their interior chaining (run ends are
    /// nulled) so the run can be re-spliced or walked for cleanup; the
    /// caller owns their destruction.
    pub fn remove<T: Linked<K>>(&mut self, arena: &mut SlotMap<K, T>, from: K, to: K, count: usize) {
        debug_assert!(count >= 1 && count <= self.len);
        debug_assert_eq!(run_length(arena, from, to), count);

        if count == self.len {
            self.first = None;
            self.len = 0;
            arena[from].link_mut().prev = K::null();
            arena[to].link_mut().next = K::null();
            return;
        }

        let next_to = arena[to].link().next;
        if self.head_in_run(arena, from, count) {
            self.first = Some(next_to);
        }

        let before = arena[from].link().prev;
        arena[before].link_mut().next = next_to;
        arena[next_to].link_mut().prev = before;
        arena[from].link_mut().prev = K::null();
        arena[to].link_mut().next = K::null();
        self.len -= count;
    }

    /// Atomically replaces the closed run `[from, to]` (length
    /// `remove_count`) with the run of `insert_count` elements starting
    /// at `with`, at the same position.
    ///
    /// The removed run is detached exactly as by [`Ring::remove`].
    pub fn replace<T: Linked<K>>(
        &mut self,
        arena: &mut SlotMap<K, T>,
        from: K,
        to: K,
        remove_count: usize,
        with: K,
        insert_count: usize,
    ) {
        debug_assert!(remove_count >= 1 && remove_count <= self.len);
        debug_assert!(insert_count >= 1);
        debug_assert_eq!(run_length(arena, from, to), remove_count);

        let with_last = advance(arena, with, insert_count - 1);

        if remove_count == self.len {
            arena[from].link_mut().prev = K::null();
            arena[to].link_mut().next = K::null();
            arena[with_last].link_mut().next = with;
            arena[with].link_mut().prev = with_last;
            self.first = Some(with);
            self.len = insert_count;
            return;
        }

        let head_in_run = self.head_in_run(arena, from, remove_count);
        let before = arena[from].link().prev;
        let after = arena[to].link().next;

        arena[before].link_mut().next = with;
        arena[with].link_mut().prev = before;
        arena[with_last].link_mut().next = after;
        arena[after].link_mut().prev = with_last;

        arena[from].link_mut().prev = K::null();
        arena[to].link_mut().next = K::null();

        if head_in_run {
            self.first = Some(with);
        }
        self.len = self.len - remove_count + insert_count;
    }

    /// Reverses the traversal direction of the whole ring in O(n),
    /// without moving any element. The head is unchanged.
    pub fn reverse<T: Linked<K>>(&mut self, arena: &mut SlotMap<K, T>) {
        let members: Vec<K> = self.iter(arena).collect();
        for k in members {
            let link = arena[k].link_mut();
            std::mem::swap(&mut link.next, &mut link.prev);
        }
    }

    /// Forgets all members without touching their links; the caller is
    /// draining the arena.
    pub fn clear(&mut self) {
        self.first = None;
        self.len = 0;
    }

    /// Iterates the member keys in ring order, starting at the head.
    pub fn iter<'a, T: Linked<K>>(&self, arena: &'a SlotMap<K, T>) -> Iter<'a, K, T> {
        Iter {
            arena,
            next: self.first,
            remaining: self.len,
        }
    }

    fn head_in_run<T: Linked<K>>(&self, arena: &SlotMap<K, T>, from: K, count: usize) -> bool {
        let Some(head) = self.first else {
            return false;
        };
        let mut k = from;
        for _ in 0..count {
            if k == head {
                return true;
            }
            k = arena[k].link().next;
        }
        false
    }
}

/// Steps `steps` times along the `next` chain from `start`.
fn advance<K: Key, T: Linked<K>>(arena: &SlotMap<K, T>, start: K, steps: usize) -> K {
    let mut k = start;
    for _ in 0..steps {
        k = arena[k].link().next;
        debug_assert!(!k.is_null(), "run shorter than declared count");
    }
    k
}

/// Walks `from` to `to` along the `next` chain; used by debug
/// assertions to check declared run lengths.
fn run_length<K: Key, T: Linked<K>>(arena: &SlotMap<K, T>, from: K, to: K) -> usize {
    let mut count = 1;
    let mut k = from;
    while k != to {
        k = arena[k].link().next;
        count += 1;
        debug_assert!(count <= arena.len(), "run does not reach its end");
    }
    count
}

/// Iterator over ring member keys.
pub struct Iter<'a, K: Key, T> {
    arena: &'a SlotMap<K, T>,
    next: Option<K>,
    remaining: usize,
}

impl<K: Key, T: Linked<K>> Iterator for Iter<'_, K, T> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = Some(self.arena[current].link().next);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Key, T: Linked<K>> ExactSizeIterator for Iter<'_, K, T> {}
