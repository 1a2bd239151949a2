pub type HashSet<K> = ahash::HashSet<K>;
pub type HashMap<K, V> = ahash::HashMap<K, V>;
