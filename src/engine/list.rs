//! Order List
//!
//! Doubly linked list whose nodes live in a `Vec` and link to each other by
//! index. Handles stay valid until the node is removed, which lets an
//! engine keep `key -> handle` in its map and move or unlink nodes in O(1).
//!
//! ```text
//!   head ─► [3] ◄──► [0] ◄──► [5] ◄── tail
//! ```

/// Stable handle to a node in an [`OrderList`].
pub type NodeId = usize;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

// == Order List ==
#[derive(Debug)]
pub struct OrderList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<T> Default for OrderList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderList<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots
            .get_mut(id)
            .and_then(Option::as_mut)
            .map(|node| &mut node.value)
    }

    pub fn back(&self) -> Option<NodeId> {
        self.tail
    }

    // == Insertion ==
    pub fn push_front(&mut self, value: T) -> NodeId {
        let id = self.alloc(value);
        self.attach_front(id);
        id
    }

    pub fn push_back(&mut self, value: T) -> NodeId {
        let id = self.alloc(value);
        self.attach_back(id);
        id
    }

    // == Removal ==
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        self.detach(id)?;
        let node = self.slots.get_mut(id)?.take()?;
        self.free.push(id);
        self.len -= 1;
        Some(node.value)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.head?;
        self.remove(id)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id)
    }

    // == Reordering ==
    /// Moves `id` to the front; returns false if `id` is not in the list.
    pub fn move_to_front(&mut self, id: NodeId) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        if self.head != Some(id) {
            self.detach(id);
            self.attach_front(id);
        }
        true
    }

    /// Iterates values from front to back.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = self.node(cursor?)?;
            cursor = node.next;
            Some(&node.value)
        })
    }

    // == Internals ==
    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id).and_then(Option::as_mut)
    }

    fn alloc(&mut self, value: T) -> NodeId {
        let node = Node {
            value,
            prev: None,
            next: None,
        };
        self.len += 1;
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn detach(&mut self, id: NodeId) -> Option<()> {
        let (prev, next) = {
            let node = self.node(id)?;
            (node.prev, node.next)
        };

        match prev.and_then(|p| self.node_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.node_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        let node = self.node_mut(id)?;
        node.prev = None;
        node.next = None;
        Some(())
    }

    fn attach_front(&mut self, id: NodeId) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|h| self.node_mut(h)) {
            Some(head_node) => head_node.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    fn attach_back(&mut self, id: NodeId) {
        let old_tail = self.tail;
        if let Some(node) = self.node_mut(id) {
            node.next = None;
            node.prev = old_tail;
        }
        match old_tail.and_then(|t| self.node_mut(t)) {
            Some(tail_node) => tail_node.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(list: &OrderList<&'static str>) -> Vec<&'static str> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_push_front_and_back() {
        let mut list = OrderList::new();
        list.push_back("b");
        list.push_front("a");
        list.push_back("c");

        assert_eq!(collect(&list), vec!["a", "b", "c"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_pop_ends() {
        let mut list = OrderList::new();
        list.push_back("a");
        list.push_back("b");
        list.push_back("c");

        assert_eq!(list.pop_front(), Some("a"));
        assert_eq!(list.pop_back(), Some("c"));
        assert_eq!(list.pop_back(), Some("b"));
        assert_eq!(list.pop_back(), None);
        assert!(list.is_empty());
        assert_eq!(list.iter().next(), None);
        assert_eq!(list.back(), None);
    }

    #[test]
    fn test_remove_middle_relinks() {
        let mut list = OrderList::new();
        list.push_back("a");
        let b = list.push_back("b");
        list.push_back("c");

        assert_eq!(list.remove(b), Some("b"));
        assert_eq!(collect(&list), vec!["a", "c"]);
        assert_eq!(list.remove(b), None);
    }

    #[test]
    fn test_move_to_front() {
        let mut list = OrderList::new();
        list.push_back("a");
        list.push_back("b");
        let c = list.push_back("c");

        assert!(list.move_to_front(c));
        assert_eq!(collect(&list), vec!["c", "a", "b"]);
        assert_eq!(list.get(list.back().unwrap()), Some(&"b"));

        assert!(list.move_to_front(c));
        assert_eq!(collect(&list), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut list = OrderList::new();
        let a = list.push_back("a");
        list.push_back("b");
        list.remove(a);

        let c = list.push_front("c");
        assert_eq!(c, a);
        assert_eq!(collect(&list), vec!["c", "b"]);
        assert!(!list.move_to_front(42));
    }
}
