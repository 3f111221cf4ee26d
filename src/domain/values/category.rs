//! Product category assignment from the listing title.
//!
//! Keyword scoring over the normalized title tokens; the category with the
//! most keyword hits wins, ties going to the earlier entry in the fixed
//! scan order. Unmatched titles fall into `Other`.

use crate::domain::values::similarity::normalize_title;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Fashion,
    Home,
    Beauty,
    Books,
    Grocery,
    Sports,
    Toys,
    #[default]
    Other,
}

const ELECTRONICS: &[&str] = &[
    "phone", "smartphone", "iphone", "laptop", "tablet", "tv", "television", "earbuds",
    "headphone", "headphones", "airdopes", "speaker", "camera", "smartwatch", "monitor",
    "router", "charger", "powerbank", "ssd", "keyboard", "mouse", "console",
];
const FASHION: &[&str] = &[
    "shirt", "tshirt", "jeans", "trousers", "dress", "kurta", "saree", "jacket", "hoodie",
    "shoes", "sneakers", "sandals", "heels", "handbag", "wallet", "sunglasses",
];
const HOME: &[&str] = &[
    "sofa", "mattress", "cookware", "mixer", "grinder", "vacuum", "curtain", "bedsheet",
    "furniture", "lamp", "cooker", "kettle", "purifier", "fan", "heater",
];
const BEAUTY: &[&str] = &[
    "lipstick", "makeup", "skincare", "serum", "shampoo", "conditioner", "moisturizer",
    "perfume", "deodorant", "sunscreen", "trimmer", "razor",
];
const BOOKS: &[&str] = &[
    "book", "novel", "paperback", "hardcover", "textbook", "comics", "notebook",
];
const GROCERY: &[&str] = &[
    "coffee", "tea", "snacks", "chocolate", "biscuits", "cereal", "oil", "rice", "atta",
    "honey", "juice",
];
const SPORTS: &[&str] = &[
    "cricket", "football", "badminton", "yoga", "dumbbell", "treadmill", "cycling",
    "cycle", "fitness", "gym", "racket",
];
const TOYS: &[&str] = &[
    "toy", "lego", "puzzle", "boardgame", "doll", "playset", "remote-controlled",
];

impl Category {
    /// All categories carrying keyword sets, in tie-break order.
    fn keyword_sets() -> &'static [(Category, &'static [&'static str])] {
        &[
            (Category::Electronics, ELECTRONICS),
            (Category::Fashion, FASHION),
            (Category::Home, HOME),
            (Category::Beauty, BEAUTY),
            (Category::Books, BOOKS),
            (Category::Grocery, GROCERY),
            (Category::Sports, SPORTS),
            (Category::Toys, TOYS),
        ]
    }

    /// Categorize a product title by keyword hits over normalized tokens.
    pub fn from_title(title: &str) -> Category {
        let normalized = normalize_title(title);
        if normalized.is_empty() {
            return Category::Other;
        }
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let mut best = Category::Other;
        let mut best_hits = 0usize;
        for (category, keywords) in Self::keyword_sets() {
            let hits = keywords
                .iter()
                .filter(|k| tokens.iter().any(|t| t == *k))
                .count();
            if hits > best_hits {
                best = *category;
                best_hits = hits;
            }
        }
        best
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Electronics => write!(f, "electronics"),
            Category::Fashion => write!(f, "fashion"),
            Category::Home => write!(f, "home"),
            Category::Beauty => write!(f, "beauty"),
            Category::Books => write!(f, "books"),
            Category::Grocery => write!(f, "grocery"),
            Category::Sports => write!(f, "sports"),
            Category::Toys => write!(f, "toys"),
            Category::Other => write!(f, "other"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "electronics" => Ok(Category::Electronics),
            "fashion" => Ok(Category::Fashion),
            "home" => Ok(Category::Home),
            "beauty" => Ok(Category::Beauty),
            "books" => Ok(Category::Books),
            "grocery" => Ok(Category::Grocery),
            "sports" => Ok(Category::Sports),
            "toys" => Ok(Category::Toys),
            "other" => Ok(Category::Other),
            _ => Err(format!("Unknown category: {s}")),
        }
    }
}
