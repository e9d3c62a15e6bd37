use rand::seq::SliceRandom;
use rand::Rng;

use crate::ArticleDescriptor;

const NUMBER_PLACEHOLDER: &str = "{number}";

const WORDS: &[&str] = &[
    "ancient", "archive", "battle", "castle", "character", "chronicle", "city", "clan", "crystal",
    "dragon", "empire", "episode", "forest", "guild", "hero", "island", "journey", "kingdom",
    "legend", "library", "lore", "map", "mountain", "mystery", "ocean", "portal", "quest", "realm",
    "river", "ruins", "season", "secret", "shadow", "spell", "story", "temple", "tower", "village",
    "voyage", "world",
];

/// Expands the form into one descriptor per article, numbered from 1.
///
/// Titles are `"{prefix} {n}"`, or `"Article {n}"` without a prefix. Every
/// `{number}` in the template becomes `n`; a blank template yields generated
/// filler text instead.
pub fn build_job_list<R: Rng + ?Sized>(
    count: u32,
    prefix: &str,
    template: &str,
    rng: &mut R,
) -> Vec<ArticleDescriptor> {
    let prefix = prefix.trim();
    let prefix = if prefix.is_empty() { "Article" } else { prefix };

    (1..=count)
        .map(|n| {
            let number = n.to_string();
            let content = if template.trim().is_empty() {
                random_text(&mut *rng)
            } else {
                template.replace(NUMBER_PLACEHOLDER, &number)
            };
            ArticleDescriptor {
                title: format!("{prefix} {number}"),
                content,
            }
        })
        .collect()
}

/// Generates a short paragraph of three to six sentences.
pub fn random_text<R: Rng + ?Sized>(rng: &mut R) -> String {
    let sentences = rng.gen_range(3..=6);
    (0..sentences)
        .map(|_| sentence(&mut *rng))
        .collect::<Vec<_>>()
        .join(" ")
}

fn sentence<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(6..=12);
    let words: Vec<&str> = (0..len)
        .filter_map(|_| WORDS.choose(&mut *rng).copied())
        .collect();
    let mut text = words.join(" ");
    if let Some(first) = text.get(..1) {
        let upper = first.to_ascii_uppercase();
        text.replace_range(..1, &upper);
    }
    text.push('.');
    text
}
