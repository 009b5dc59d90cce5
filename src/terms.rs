//! Static lookup tables.
//!
//! `SEARCH_TERMS` maps Hebrew surface forms (single words and short phrases) to the
//! English terms the product index understands. Every inflection is listed on its own.
//! `CATEGORY_NAMES` maps the remote API's English category names to Hebrew display names.

/// Hebrew → English search vocabulary.
pub const SEARCH_TERMS: &[(&str, &str)] = &[
    // Phrases
    ("אוזניות אלחוטיות", "wireless headphones"),
    ("חולצת טריקו", "t-shirt"),
    ("נעלי ספורט", "sneakers"),
    ("שעון חכם", "smartwatch"),
    ("תיק גב", "backpack"),
    // Clothing
    ("טייץ", "leggings"),
    ("טייצים", "leggings"),
    ("חולצה", "shirt"),
    ("חולצות", "shirts"),
    ("חולצת", "shirt"),
    ("שמלה", "dress"),
    ("שמלות", "dresses"),
    ("מכנסיים", "pants"),
    ("מכנס", "pants"),
    ("גינס", "jeans"),
    // Footwear
    ("נעליים", "shoes"),
    ("נעל", "shoe"),
    ("ספורט", "sport"),
    ("סניקרס", "sneakers"),
    ("מגפיים", "boots"),
    ("מגף", "boot"),
    // Electronics
    ("אוזניות", "headphones"),
    ("אלחוטיות", "wireless"),
    ("אלחוטי", "wireless"),
    ("רחפן", "drone"),
    ("שעון", "watch"),
    ("חכם", "smart"),
    ("חכמה", "smart"),
    // Bags
    ("תיק", "bag"),
    ("תיקים", "bags"),
    ("גב", "back"),
    ("ארנק", "wallet"),
    // Colors
    ("אדום", "red"),
    ("אדומה", "red"),
    ("כחול", "blue"),
    ("כחולה", "blue"),
    ("ירוק", "green"),
    ("ירוקה", "green"),
    ("שחור", "black"),
    ("שחורה", "black"),
    ("לבן", "white"),
    ("לבנה", "white"),
    ("ורוד", "pink"),
    ("ורודה", "pink"),
    ("צהוב", "yellow"),
    ("צהובה", "yellow"),
    // Audience
    ("גברים", "men"),
    ("לגבר", "men"),
    ("נשים", "women"),
    ("לאישה", "women"),
    ("ילדים", "kids"),
    ("ילד", "boy"),
    ("ילדה", "girl"),
];

/// English category name → Hebrew display name.
pub const CATEGORY_NAMES: &[(&str, &str)] = &[
    ("Women's Clothing", "ביגוד נשים"),
    ("Men's Clothing", "ביגוד גברים"),
    ("Cellphones & Telecommunications", "טלפונים סלולריים ותקשורת"),
    ("Computer & Office", "מחשבים ומשרד"),
    ("Consumer Electronics", "מוצרי אלקטרוניקה"),
    ("Jewelry & Accessories", "תכשיטים ואביזרים"),
    ("Home & Garden", "בית וגינה"),
    ("Luggage & Bags", "מזוודות ותיקים"),
    ("Shoes", "נעליים"),
    ("Mother & Kids", "אמא וילדים"),
    ("Sports & Entertainment", "ספורט ופנאי"),
    ("Beauty & Health", "יופי ובריאות"),
    ("Watches", "שעונים"),
    ("Toys & Hobbies", "צעצועים ותחביבים"),
    ("Automobiles & Motorcycles", "רכב ואופנועים"),
    ("Home Improvement", "שיפוץ הבית"),
    ("Tools", "כלי עבודה"),
    ("Lights & Lighting", "תאורה"),
    ("Hair Extensions & Wigs", "תוספות שיער ופאות"),
    ("Apparel Accessories", "אביזרי אופנה"),
    ("Underwear & Sleepwears", "הלבשה תחתונה ופיג'מות"),
    ("Home Appliances", "מכשירי חשמל לבית"),
    ("Furniture", "רהיטים"),
    ("Security & Protection", "אבטחה והגנה"),
    ("Office & School Supplies", "ציוד משרדי ולימודי"),
    ("Food", "מזון"),
    ("Novelty & Special Use", "מוצרים מיוחדים"),
    ("Weddings & Events", "חתונות ואירועים"),
    ("Electronic Components & Supplies", "רכיבים אלקטרוניים"),
    ("Pet Products", "מוצרים לחיות מחמד"),
];

/// An ordered source → target mapping with exact-match lookup.
#[derive(Debug, Clone, Default)]
pub struct TermTable {
    entries: Vec<(String, String)>,
}

impl TermTable {
    /// Build a table from pairs. A later duplicate key replaces the earlier value.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
        Self { entries }
    }

    /// The built-in search vocabulary.
    pub fn search_terms() -> Self {
        Self::from_pairs(SEARCH_TERMS.iter().copied())
    }

    /// The built-in category display names.
    pub fn category_names() -> Self {
        Self::from_pairs(CATEGORY_NAMES.iter().copied())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
