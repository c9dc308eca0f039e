use anyhow::{Result, anyhow, bail};
use game_types::Difficulty;
use std::collections::HashSet;

use crate::GameRng;

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub difficulty: Difficulty,
    pub words: Vec<String>,
}

impl Category {
    fn new(name: &str, difficulty: Difficulty, words: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            difficulty,
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WordBank {
    categories: Vec<Category>,
}

impl WordBank {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The built-in category catalogue.
    pub fn standard() -> Self {
        use Difficulty::*;

        Self::new(vec![
            Category::new(
                "Capital Cities",
                Easy,
                &[
                    "London", "Paris", "Berlin", "Rome", "Madrid", "Amsterdam", "Vienna",
                    "Prague", "Budapest", "Warsaw", "Stockholm", "Oslo", "Copenhagen",
                    "Helsinki", "Reykjavik", "Dublin", "Brussels", "Luxembourg", "Bern",
                    "Vaduz", "Monaco", "San Marino", "Vatican City", "Andorra",
                ],
            ),
            Category::new(
                "Animals",
                Easy,
                &[
                    "Lion", "Tiger", "Elephant", "Giraffe", "Zebra", "Monkey", "Gorilla",
                    "Chimpanzee", "Panda", "Koala", "Kangaroo", "Platypus", "Echidna", "Wombat",
                    "Dingo", "Emu", "Cassowary", "Kookaburra", "Duck", "Goose", "Swan", "Eagle",
                    "Hawk", "Falcon", "Owl", "Penguin", "Seal", "Dolphin", "Whale", "Shark",
                ],
            ),
            Category::new(
                "Food & Drinks",
                Easy,
                &[
                    "Pizza", "Burger", "Pasta", "Sushi", "Taco", "Burrito", "Sandwich", "Salad",
                    "Soup", "Steak", "Chicken", "Fish", "Rice", "Bread", "Cake", "Cookie",
                    "Ice Cream", "Chocolate", "Coffee", "Tea", "Juice", "Milk", "Water", "Soda",
                ],
            ),
            Category::new(
                "Movies",
                Medium,
                &[
                    "Titanic", "Avatar", "Star Wars", "Lord of the Rings", "Harry Potter",
                    "Batman", "Superman", "Spider-Man", "Iron Man", "Black Panther",
                    "Wonder Woman", "Avengers", "Jurassic Park", "Jaws", "E.T.",
                    "Back to the Future", "Indiana Jones", "Die Hard", "Terminator", "Matrix",
                ],
            ),
            Category::new(
                "Sports",
                Easy,
                &[
                    "Football", "Basketball", "Baseball", "Soccer", "Tennis", "Golf", "Hockey",
                    "Volleyball", "Rugby", "Cricket", "Boxing", "Wrestling", "Swimming",
                    "Running", "Cycling", "Skiing", "Snowboarding", "Surfing", "Skateboarding",
                    "Gymnastics", "Athletics",
                ],
            ),
            Category::new(
                "Countries",
                Medium,
                &[
                    "United States", "Canada", "Mexico", "Brazil", "Argentina", "Chile", "Peru",
                    "Colombia", "Ecuador", "Bolivia", "Uruguay", "France", "Germany", "Italy",
                    "Spain", "Portugal", "Netherlands", "Belgium", "Switzerland", "Austria",
                    "Poland", "Hungary", "Greece", "Turkey", "China", "Japan",
                ],
            ),
            Category::new(
                "Famous People",
                Hard,
                &[
                    "Einstein", "Newton", "Galileo", "Da Vinci", "Shakespeare", "Mozart",
                    "Beethoven", "Bach", "Picasso", "Van Gogh", "Monet", "Rembrandt",
                    "Michelangelo", "Napoleon", "Caesar", "Cleopatra", "Joan of Arc",
                    "Elvis Presley", "Madonna", "Adele",
                ],
            ),
            Category::new(
                "Inventions",
                Hard,
                &[
                    "Telephone", "Light Bulb", "Computer", "Internet", "Smartphone",
                    "Television", "Radio", "Camera", "Car", "Airplane", "Train", "Bicycle",
                    "Submarine", "Rocket", "Satellite", "Microwave", "Refrigerator",
                    "Dishwasher", "Clock", "Watch",
                ],
            ),
            Category::new(
                "Science",
                Hard,
                &[
                    "Physics", "Chemistry", "Biology", "Mathematics", "Astronomy", "Geology",
                    "Botany", "Zoology", "Anatomy", "Genetics", "Evolution", "DNA", "Atom",
                    "Molecule", "Cell", "Gravity", "Electricity", "Magnetism", "Energy",
                    "Velocity",
                ],
            ),
            Category::new(
                "Literature",
                Medium,
                &[
                    "Novel", "Poetry", "Drama", "Comedy", "Tragedy", "Romance", "Mystery",
                    "Thriller", "Horror", "Fantasy", "Biography", "Memoir", "Essay", "Chapter",
                    "Verse", "Stanza", "Metaphor", "Irony", "Satire", "Fable", "Myth",
                ],
            ),
        ])
    }

    /// Parse a catalogue of `[Name: Difficulty]` sections, one word per line.
    /// Blank lines and `#` comments are skipped.
    pub fn from_category_list(text: &str) -> Result<Self> {
        let mut categories: Vec<Category> = Vec::new();

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let (name, difficulty) = header
                    .split_once(':')
                    .ok_or_else(|| anyhow!("Line {}: expected [Name: Difficulty]", line_no + 1))?;
                let difficulty = difficulty
                    .parse::<Difficulty>()
                    .map_err(|e| anyhow!("Line {}: {}", line_no + 1, e))?;
                categories.push(Category {
                    name: name.trim().to_string(),
                    difficulty,
                    words: Vec::new(),
                });
                continue;
            }

            match categories.last_mut() {
                Some(category) => category.words.push(line.to_string()),
                None => bail!("Line {}: word '{}' outside of a category", line_no + 1, line),
            }
        }

        if categories.is_empty() {
            bail!("Category list contains no categories");
        }
        if let Some(empty) = categories.iter().find(|c| c.words.is_empty()) {
            bail!("Category '{}' has no words", empty.name);
        }

        Ok(Self::new(categories))
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn find_category(&self, name: &str) -> Option<&Category> {
        let name = name.trim();
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn categories_by_difficulty(&self, difficulty: Difficulty) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| c.difficulty == difficulty)
            .collect()
    }

    pub fn words_by_difficulty(&self, difficulty: Difficulty) -> Vec<&str> {
        self.categories_by_difficulty(difficulty)
            .into_iter()
            .flat_map(|c| c.words.iter().map(String::as_str))
            .collect()
    }

    /// Pick a random category, optionally restricted to one difficulty.
    pub fn random_category(
        &self,
        rng: &mut GameRng,
        difficulty: Option<Difficulty>,
    ) -> Result<&Category> {
        let candidates: Vec<&Category> = match difficulty {
            Some(difficulty) => self.categories_by_difficulty(difficulty),
            None => self.categories.iter().collect(),
        };

        rng.pick(&candidates)
            .copied()
            .ok_or_else(|| match difficulty {
                Some(d) => anyhow!("No categories available for difficulty {}", d),
                None => anyhow!("No categories available"),
            })
    }

    pub fn random_word<'a>(&self, rng: &mut GameRng, category: &'a Category) -> Result<&'a str> {
        rng.pick(&category.words)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("Category '{}' has no words", category.name))
    }
}

/// Canonical form used for duplicate detection.
pub fn normalize_word(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Words already played this session, normalised and in play order.
#[derive(Debug, Clone, Default)]
pub struct UsedWords {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl UsedWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.seen.contains(&normalize_word(text))
    }

    /// Record a word. Returns `false` if its normalised form was already used.
    pub fn insert(&mut self, text: &str) -> bool {
        let word = normalize_word(text);
        if word.is_empty() || !self.seen.insert(word.clone()) {
            return false;
        }
        self.order.push(word);
        true
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
