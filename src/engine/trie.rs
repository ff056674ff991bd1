use std::collections::HashMap;

/// One node of a [`Trie`]. The root carries `'\0'` as a placeholder prefix.
#[derive(Debug)]
pub struct TrieNode<T> {
    pub prefix: char,
    pub terminal: bool,
    pub payload: Option<T>,
    children: HashMap<char, TrieNode<T>>,
}

impl<T> TrieNode<T> {
    fn new(prefix: char) -> Self {
        Self {
            prefix,
            terminal: false,
            payload: None,
            children: HashMap::new(),
        }
    }

    pub fn child(&self, ch: char) -> Option<&TrieNode<T>> {
        self.children.get(&ch)
    }

    pub fn children(&self) -> impl Iterator<Item = &TrieNode<T>> {
        self.children.values()
    }
}

/// Prefix tree keyed by `char`, with per-node hashed child lookup.
///
/// A path spelling `key` from the root ends on a terminal node iff `key`
/// was inserted. Walks are iterative so key length is not bounded by the
/// call stack.
#[derive(Debug)]
pub struct Trie<T> {
    root: TrieNode<T>,
    len: usize,
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Trie<T> {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new('\0'),
            len: 0,
        }
    }

    /// Inserts `key`, overwriting the payload if it is already present.
    pub fn insert(&mut self, key: &str, payload: T) {
        let mut node = &mut self.root;
        for ch in key.chars() {
            node = node
                .children
                .entry(ch)
                .or_insert_with(|| TrieNode::new(ch));
        }
        if !node.terminal {
            node.terminal = true;
            self.len += 1;
        }
        node.payload = Some(payload);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some_and(|node| node.terminal)
    }

    /// Payload stored under `key`, or `None` when `key` was never inserted.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.find(key)
            .filter(|node| node.terminal)
            .and_then(|node| node.payload.as_ref())
    }

    /// Number of distinct keys inserted.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root(&self) -> &TrieNode<T> {
        &self.root
    }

    fn find(&self, key: &str) -> Option<&TrieNode<T>> {
        let mut node = &self.root;
        for ch in key.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }
}

impl<T> Drop for Trie<T> {
    // Tear down with an explicit stack so a long chain does not recurse through nested drops.
    fn drop(&mut self) {
        let mut pending: Vec<TrieNode<T>> = self.root.children.drain().map(|(_, n)| n).collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.children.drain().map(|(_, n)| n));
        }
    }
}

impl<T, K: AsRef<str>> FromIterator<(K, T)> for Trie<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut trie = Trie::new();
        for (key, payload) in iter {
            trie.insert(key.as_ref(), payload);
        }
        trie
    }
}
