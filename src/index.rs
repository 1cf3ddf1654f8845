use std::collections::HashMap;

/// A lookup from key to the record that owns it, borrowed from the table
/// it was built from.
#[derive(Debug)]
pub struct Index<'a, T> {
    by_key: HashMap<&'a str, &'a T>,
}

impl<'a, T> Index<'a, T> {
    /// Builds an index over `items`, keyed by `key`.
    ///
    /// Keys are not checked for uniqueness: when two items share a key,
    /// the later one wins.
    ///
    /// # Examples
    ///
    /// ```
    /// # use matreport::Index;
    /// let pairs = [("a", 1), ("b", 2), ("a", 3)];
    /// let index = Index::build(&pairs, |p| p.0);
    /// assert_eq!(index.get("a"), Some(&("a", 3)));
    /// assert_eq!(index.len(), 2);
    /// ```
    pub fn build(items: &'a [T], key: impl Fn(&'a T) -> &'a str) -> Self {
        let by_key = items.iter().map(|item| (key(item), item)).collect();
        Self { by_key }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a T> {
        self.by_key.get(key).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Client;

    fn client(id: &str, city: &str) -> Client {
        Client {
            id: id.into(),
            city: Some(city.into()),
        }
    }

    #[test]
    fn build_fn_indexes_items_by_key() {
        let clients = vec![client("C1", "Bogota"), client("C2", "Cali")];
        let index = Index::build(&clients, |c| c.id.as_str());
        assert_eq!(index.get("C2").map(Client::city), Some("Cali"));
        assert_eq!(index.get("C9"), None);
    }

    #[test]
    fn build_fn_keeps_last_duplicate() {
        let clients = vec![client("C1", "Bogota"), client("C1", "Medellin")];
        let index = Index::build(&clients, |c| c.id.as_str());
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("C1").map(Client::city), Some("Medellin"));
    }
}
