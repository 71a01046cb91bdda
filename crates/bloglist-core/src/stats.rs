//! Aggregation over blog collections
//!
//! Pure functions, no I/O. Grouping keeps authors in first-seen order and a
//! later group only replaces the leader with a strictly larger value, so ties
//! always resolve to the author encountered first. Like sums saturate at
//! `u64::MAX`.

use crate::Blog;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Anything carrying an author and a like count
pub trait Rated {
    fn author(&self) -> &str;
    fn likes(&self) -> u64;
}

impl Rated for Blog {
    fn author(&self) -> &str {
        &self.author
    }

    fn likes(&self) -> u64 {
        self.likes
    }
}

/// Result of [`favorite_blog`]
///
/// An empty collection yields `Sentinel { likes: 0 }` rather than "nothing",
/// serialized as `{"likes":0}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Favorite<'a, T> {
    Entry(&'a T),
    Sentinel { likes: u64 },
}

impl<'a, T: Rated> Favorite<'a, T> {
    pub fn entry(&self) -> Option<&'a T> {
        match self {
            Favorite::Entry(entry) => Some(*entry),
            Favorite::Sentinel { .. } => None,
        }
    }

    pub fn likes(&self) -> u64 {
        match self {
            Favorite::Entry(entry) => entry.likes(),
            Favorite::Sentinel { likes } => *likes,
        }
    }
}

/// Author with the most entries; both fields absent for empty input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorBlogs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// Author with the most accumulated likes; both fields absent for empty input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorLikes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
}

/// All aggregates over one collection
#[derive(Debug, Clone, Serialize)]
pub struct BlogStats<'a, T> {
    pub total_likes: u64,
    pub favorite: Favorite<'a, T>,
    pub most_blogs: AuthorBlogs,
    pub most_likes: AuthorLikes,
}

/// Sum of likes; 0 for an empty collection
pub fn total_likes<T: Rated>(blogs: &[T]) -> u64 {
    blogs
        .iter()
        .fold(0, |total: u64, blog| total.saturating_add(blog.likes()))
}

/// First entry with the maximum number of likes
///
/// A non-empty collection always yields an entry, even when every entry has
/// zero likes.
pub fn favorite_blog<T: Rated>(blogs: &[T]) -> Favorite<'_, T> {
    let mut best: Option<&T> = None;
    for blog in blogs {
        match best {
            Some(current) if blog.likes() <= current.likes() => {}
            _ => best = Some(blog),
        }
    }

    best.map(Favorite::Entry)
        .unwrap_or(Favorite::Sentinel { likes: 0 })
}

/// Author with the highest number of entries
pub fn most_blogs<T: Rated>(blogs: &[T]) -> AuthorBlogs {
    match leader(tally(blogs, |_| 1)) {
        Some((author, count)) => AuthorBlogs {
            author: Some(author.to_string()),
            count: Some(count),
        },
        None => AuthorBlogs::default(),
    }
}

/// Author whose entries have the highest like total
pub fn most_likes<T: Rated>(blogs: &[T]) -> AuthorLikes {
    match leader(tally(blogs, T::likes)) {
        Some((author, likes)) => AuthorLikes {
            author: Some(author.to_string()),
            likes: Some(likes),
        },
        None => AuthorLikes::default(),
    }
}

/// Compute every aggregate in one call
pub fn summarize<T: Rated>(blogs: &[T]) -> BlogStats<'_, T> {
    BlogStats {
        total_likes: total_likes(blogs),
        favorite: favorite_blog(blogs),
        most_blogs: most_blogs(blogs),
        most_likes: most_likes(blogs),
    }
}

/// Group by exact author string, preserving first-seen order
fn tally<'a, T: Rated>(blogs: &'a [T], weight: impl Fn(&T) -> u64) -> Vec<(&'a str, u64)> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, u64)> = Vec::new();

    for blog in blogs {
        let author = blog.author();
        match index.get(author) {
            Some(&i) => groups[i].1 = groups[i].1.saturating_add(weight(blog)),
            None => {
                index.insert(author, groups.len());
                groups.push((author, weight(blog)));
            }
        }
    }

    groups
}

fn leader(groups: Vec<(&str, u64)>) -> Option<(&str, u64)> {
    groups.into_iter().fold(None, |best, group| match best {
        Some(current) if group.1 <= current.1 => Some(current),
        _ => Some(group),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn blog(title: &str, author: &str, likes: u64) -> Blog {
        Blog::new(title, author, format!("{title}.com"), likes, Uuid::nil())
    }

    fn sample() -> Vec<Blog> {
        vec![
            blog("React patterns", "Michael Chan", 7),
            blog(
                "Go To Statement Considered Harmful",
                "Edsger W. Dijkstra",
                5,
            ),
            blog("Canonical string reduction", "Edsger W. Dijkstra", 12),
            blog("First class tests", "Robert C. Martin", 10),
            blog("TDD harms architecture", "Robert C. Martin", 0),
            blog("Type wars", "Robert C. Martin", 2),
        ]
    }

    #[test]
    fn test_total_likes() {
        assert_eq!(total_likes::<Blog>(&[]), 0);
        assert_eq!(
            total_likes(&[
                blog("Kalat", "Karppi Koski", 3),
                blog("Joet", "Joel Jokinen", 0)
            ]),
            3
        );
        assert_eq!(total_likes(&sample()), 36);
    }

    #[test]
    fn test_favorite_blog_empty_is_sentinel() {
        let favorite = favorite_blog::<Blog>(&[]);
        assert_eq!(favorite, Favorite::Sentinel { likes: 0 });
        assert!(favorite.entry().is_none());
        assert_eq!(
            serde_json::to_value(&favorite).unwrap(),
            serde_json::json!({"likes": 0})
        );
    }

    #[test]
    fn test_favorite_blog() {
        let blogs = vec![
            blog("Kalat", "Karppi Koski", 3),
            blog("Joet", "Joel Jokinen", 0),
        ];
        let favorite = favorite_blog(&blogs);
        assert_eq!(favorite.entry().map(|b| b.title.as_str()), Some("Kalat"));
        assert_eq!(favorite.likes(), 3);

        let blogs = sample();
        assert_eq!(
            favorite_blog(&blogs).entry().map(|b| b.title.as_str()),
            Some("Canonical string reduction")
        );
    }

    #[test]
    fn test_favorite_blog_tie_keeps_first() {
        let blogs = vec![blog("a", "A", 4), blog("b", "B", 9), blog("c", "C", 9)];
        assert_eq!(
            favorite_blog(&blogs).entry().map(|b| b.title.as_str()),
            Some("b")
        );
    }

    #[test]
    fn test_favorite_blog_all_zero_likes() {
        let blogs = vec![blog("first", "A", 0), blog("second", "B", 0)];
        let favorite = favorite_blog(&blogs);
        assert_eq!(favorite.entry().map(|b| b.title.as_str()), Some("first"));
        assert_eq!(favorite.likes(), 0);
    }

    #[test]
    fn test_most_blogs() {
        assert_eq!(most_blogs::<Blog>(&[]), AuthorBlogs::default());
        assert_eq!(
            most_blogs(&sample()),
            AuthorBlogs {
                author: Some("Robert C. Martin".to_string()),
                count: Some(3),
            }
        );
    }

    #[test]
    fn test_most_blogs_tie_first_seen() {
        let blogs = vec![
            blog("1", "B", 1),
            blog("2", "A", 1),
            blog("3", "A", 1),
            blog("4", "B", 1),
        ];
        assert_eq!(most_blogs(&blogs).author.as_deref(), Some("B"));
    }

    #[test]
    fn test_most_likes() {
        let blogs = vec![
            blog("1", "A", 2),
            blog("2", "B", 5),
            blog("3", "A", 3),
            blog("4", "B", 3),
        ];
        assert_eq!(
            most_likes(&blogs),
            AuthorLikes {
                author: Some("B".to_string()),
                likes: Some(8),
            }
        );
        assert_eq!(
            most_likes(&sample()).author.as_deref(),
            Some("Edsger W. Dijkstra")
        );
        assert_eq!(most_likes(&sample()).likes, Some(17));
    }

    #[test]
    fn test_most_likes_empty_serializes_without_fields() {
        let json = serde_json::to_value(most_likes::<Blog>(&[])).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_author_grouping_is_exact_match() {
        let blogs = vec![
            blog("1", "dijkstra", 1),
            blog("2", "Dijkstra", 1),
            blog("3", "Dijkstra ", 1),
        ];
        assert_eq!(most_blogs(&blogs).count, Some(1));
        assert_eq!(most_blogs(&blogs).author.as_deref(), Some("dijkstra"));
    }

    #[test]
    fn test_like_sums_saturate() {
        let huge = i64::MAX as u64;
        let blogs = vec![
            blog("1", "A", huge),
            blog("2", "A", huge),
            blog("3", "A", huge),
        ];

        assert_eq!(total_likes(&blogs), u64::MAX);
        assert_eq!(most_likes(&blogs).likes, Some(u64::MAX));
        assert_eq!(
            total_likes(&[blog("max", "A", u64::MAX), blog("one", "B", 1)]),
            u64::MAX
        );
        assert_eq!(summarize(&blogs).favorite.likes(), huge);
    }

    #[test]
    fn test_summarize() {
        let blogs = sample();
        let stats = summarize(&blogs);
        assert_eq!(stats.total_likes, 36);
        assert_eq!(stats.favorite.likes(), 12);
        assert_eq!(stats.most_blogs.count, Some(3));
        assert_eq!(stats.most_likes.likes, Some(17));
    }
}
