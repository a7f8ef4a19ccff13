//! Static and dynamic indexing tables (RFC 7541 Section 2.3).
//!
//! The two tables share one address space: indices 1..=61 are the static
//! table, higher indices reach into the dynamic table, newest entry first.
//! Insertion renumbers by prepending at the head; eviction pops the tail.

use std::collections::{HashMap, VecDeque};
use std::sync::OnceLock;

use bytes::Bytes;

/// Number of entries in the static table.
pub const STATIC_TABLE_LEN: usize = 61;

/// HPACK static table entries: (name, value). Indices 1..=61 on the wire.
const STATIC_TABLE: [(&[u8], &[u8]); STATIC_TABLE_LEN] = [
    (b":authority", b""),                   // 1
    (b":method", b"GET"),                   // 2
    (b":method", b"POST"),                  // 3
    (b":path", b"/"),                       // 4
    (b":path", b"/index.html"),             // 5
    (b":scheme", b"http"),                  // 6
    (b":scheme", b"https"),                 // 7
    (b":status", b"200"),                   // 8
    (b":status", b"204"),                   // 9
    (b":status", b"206"),                   // 10
    (b":status", b"304"),                   // 11
    (b":status", b"400"),                   // 12
    (b":status", b"404"),                   // 13
    (b":status", b"500"),                   // 14
    (b"accept-charset", b""),               // 15
    (b"accept-encoding", b"gzip, deflate"), // 16
    (b"accept-language", b""),              // 17
    (b"accept-ranges", b""),                // 18
    (b"accept", b""),                       // 19
    (b"access-control-allow-origin", b""),  // 20
    (b"age", b""),                          // 21
    (b"allow", b""),                        // 22
    (b"authorization", b""),                // 23
    (b"cache-control", b""),                // 24
    (b"content-disposition", b""),          // 25
    (b"content-encoding", b""),             // 26
    (b"content-language", b""),             // 27
    (b"content-length", b""),               // 28
    (b"content-location", b""),             // 29
    (b"content-range", b""),                // 30
    (b"content-type", b""),                 // 31
    (b"cookie", b""),                       // 32
    (b"date", b""),                         // 33
    (b"etag", b""),                         // 34
    (b"expect", b""),                       // 35
    (b"expires", b""),                      // 36
    (b"from", b""),                         // 37
    (b"host", b""),                         // 38
    (b"if-match", b""),                     // 39
    (b"if-modified-since", b""),            // 40
    (b"if-none-match", b""),                // 41
    (b"if-range", b""),                     // 42
    (b"if-unmodified-since", b""),          // 43
    (b"last-modified", b""),                // 44
    (b"link", b""),                         // 45
    (b"location", b""),                     // 46
    (b"max-forwards", b""),                 // 47
    (b"proxy-authenticate", b""),           // 48
    (b"proxy-authorization", b""),          // 49
    (b"range", b""),                        // 50
    (b"referer", b""),                      // 51
    (b"refresh", b""),                      // 52
    (b"retry-after", b""),                  // 53
    (b"server", b""),                       // 54
    (b"set-cookie", b""),                   // 55
    (b"strict-transport-security", b""),    // 56
    (b"transfer-encoding", b""),            // 57
    (b"user-agent", b""),                   // 58
    (b"vary", b""),                         // 59
    (b"via", b""),                          // 60
    (b"www-authenticate", b""),             // 61
];

/// Static table entry by 1-based wire index.
pub(crate) fn static_entry(index: usize) -> Option<(&'static [u8], &'static [u8])> {
    STATIC_TABLE.get(index.checked_sub(1)?).copied()
}

/// `name -> lowest static index`.
fn static_name_map() -> &'static HashMap<&'static [u8], usize> {
    static MAP: OnceLock<HashMap<&'static [u8], usize>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = HashMap::with_capacity(STATIC_TABLE_LEN);
        for (i, (name, _)) in STATIC_TABLE.iter().enumerate() {
            map.entry(*name).or_insert(i + 1);
        }
        map
    })
}

/// `name -> value -> static index`, empty values included. Two levels of
/// keying make name/value collisions impossible without picking a separator
/// octet.
fn static_pair_map() -> &'static HashMap<&'static [u8], HashMap<&'static [u8], usize>> {
    static MAP: OnceLock<HashMap<&'static [u8], HashMap<&'static [u8], usize>>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map: HashMap<&'static [u8], HashMap<&'static [u8], usize>> = HashMap::new();
        for (i, (name, value)) in STATIC_TABLE.iter().enumerate() {
            map.entry(*name).or_default().insert(*value, i + 1);
        }
        map
    })
}

/// Lowest static index whose entry carries both `name` and `value`.
pub(crate) fn find_static_pair(name: &[u8], value: &[u8]) -> Option<usize> {
    static_pair_map().get(name)?.get(value).copied()
}

/// Lowest static index whose entry carries `name`.
pub(crate) fn find_static_name(name: &[u8]) -> Option<usize> {
    static_name_map().get(name).copied()
}

/// One dynamic table entry. A header's `sensitive` marker is a per-block
/// attribute and is never stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub name: Bytes,
    pub value: Bytes,
}

impl TableEntry {
    /// Octet size for table accounting (RFC 7541 Section 4.1):
    /// `32 + len(name) + len(value)`.
    pub fn size(&self) -> usize {
        self.name.len() + self.value.len() + 32
    }
}

/// HPACK dynamic table (RFC 7541 Section 2.3.2).
///
/// Entries are stored newest-first: position 0 is wire index
/// `STATIC_TABLE_LEN + 1`.
#[derive(Debug)]
pub struct DynamicTable {
    entries: VecDeque<TableEntry>,
    size: usize,
    max_size: usize,
}

impl DynamicTable {
    pub(crate) fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            size: 0,
            max_size,
        }
    }

    /// Entry by 0-based position, newest first.
    pub fn get(&self, position: usize) -> Option<&TableEntry> {
        self.entries.get(position)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of entry sizes currently held.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current size cap.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Iterate entries newest-first.
    pub fn iter(&self) -> impl Iterator<Item = &TableEntry> {
        self.entries.iter()
    }

    /// Insert at the head, evicting from the tail until the entry fits.
    ///
    /// An entry larger than the whole cap empties the table and is itself
    /// dropped; the wire representation that referenced the insert stands
    /// regardless (RFC 7541 Section 4.4).
    pub(crate) fn insert(&mut self, name: Bytes, value: Bytes) {
        let entry = TableEntry { name, value };
        let entry_size = entry.size();
        while self.size + entry_size > self.max_size && !self.entries.is_empty() {
            if let Some(evicted) = self.entries.pop_back() {
                self.size -= evicted.size();
            }
        }
        if entry_size > self.max_size {
            return;
        }
        self.size += entry_size;
        self.entries.push_front(entry);
    }

    /// Change the cap, evicting from the tail until the contents fit.
    pub(crate) fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        while self.size > self.max_size && !self.entries.is_empty() {
            if let Some(evicted) = self.entries.pop_back() {
                self.size -= evicted.size();
            }
        }
    }

    /// Wire index of the newest exact match, if any.
    pub(crate) fn find_pair(&self, name: &[u8], value: &[u8]) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.name == name && e.value == value)
            .map(|i| STATIC_TABLE_LEN + 1 + i)
    }

    /// Wire index of the newest name match, if any.
    pub(crate) fn find_name(&self, name: &[u8]) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .map(|i| STATIC_TABLE_LEN + 1 + i)
    }
}
