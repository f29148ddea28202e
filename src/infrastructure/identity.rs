use crate::core::client::IdentityProvider;
use rand::seq::SliceRandom;
use rand::Rng;

/// Random display-identity generator
///
/// Produces names like `MarcusReyes47`. Draws are independent; collisions
/// across concurrent sessions are possible and acceptable.
pub struct IdentityGenerator;

const FIRST_NAMES: &[&str] = &[
    "Aiden", "Bella", "Carlos", "Daria", "Elias", "Fiona", "Gustav", "Hana", "Ivan", "Jolene",
    "Kai", "Liam", "Marcus", "Nadia", "Oscar", "Petra", "Quinn", "Rosa", "Stefan", "Talia",
    "Umar", "Vera", "Wesley", "Ximena", "Yusuf", "Zara",
];

const LAST_NAMES: &[&str] = &[
    "Anders", "Bauer", "Castillo", "Dawson", "Eriksen", "Fletcher", "Garza", "Holt", "Ibarra",
    "Jensen", "Keller", "Lindqvist", "Moreno", "Novak", "Oliveira", "Petrov", "Quintero",
    "Reyes", "Silva", "Tanaka", "Urbina", "Vargas", "Walsh", "Yamada", "Zimmer",
];

impl IdentityGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IdentityGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for IdentityGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Player");
        let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("One");
        let number: u8 = rng.gen_range(20..=99);

        format!("{}{}{}", first, last, number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_shape() {
        let generator = IdentityGenerator::new();

        for _ in 0..100 {
            let identity = generator.generate();
            assert!(!identity.is_empty());
            assert!(identity.chars().all(|c| c.is_ascii_alphanumeric()));

            // Trailing two-digit suffix in 20..=99
            let suffix: String = identity
                .chars()
                .rev()
                .take_while(|c| c.is_ascii_digit())
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            let number: u8 = suffix.parse().unwrap();
            assert!((20..=99).contains(&number));
        }
    }

    #[test]
    fn test_no_uniqueness_contract() {
        // Generation is independent per call; this only checks the
        // generator keeps producing values, not that they differ
        let generator = IdentityGenerator::new();
        let a = generator.generate();
        let b = generator.generate();
        assert!(!a.is_empty());
        assert!(!b.is_empty());
    }
}
