//! Tag partitioning.
//!
//! An image's taggings are split into tags the source service attached and
//! tags staff attached by hand. The same tag may appear on both sides.

use std::collections::HashSet;

use lentil_db::entities::{tag, tagging};

fn picked_tags(taggings: &[(tagging::Model, tag::Model)], staff: bool) -> Vec<tag::Model> {
    let mut seen = HashSet::new();
    let mut tags: Vec<tag::Model> = taggings
        .iter()
        .filter(|(tagging, _)| tagging.staff_tag == staff)
        .filter(|(_, tag)| seen.insert(tag.id.clone()))
        .map(|(_, tag)| tag.clone())
        .collect();

    tags.sort_by(|a, b| a.name.cmp(&b.name));
    tags
}

/// Tags attached by the source service, sorted by name.
#[must_use]
pub fn service_picked_tags(taggings: &[(tagging::Model, tag::Model)]) -> Vec<tag::Model> {
    picked_tags(taggings, false)
}

/// Tags attached by staff, sorted by name.
#[must_use]
pub fn staff_picked_tags(taggings: &[(tagging::Model, tag::Model)]) -> Vec<tag::Model> {
    picked_tags(taggings, true)
}

/// Tags staff can still attach to an image.
///
/// Everything in `all_tags` except tags the image already carries that are
/// not also staff tags. Sorted by name.
#[must_use]
pub fn available_staff_tags(
    all_tags: Vec<tag::Model>,
    image_tags: &[tag::Model],
    staff_tags: &[tag::Model],
) -> Vec<tag::Model> {
    let staff_ids: HashSet<&str> = staff_tags.iter().map(|t| t.id.as_str()).collect();
    let taken: HashSet<&str> = image_tags
        .iter()
        .map(|t| t.id.as_str())
        .filter(|id| !staff_ids.contains(id))
        .collect();

    let mut available: Vec<tag::Model> = all_tags
        .into_iter()
        .filter(|t| !taken.contains(t.id.as_str()))
        .collect();

    available.sort_by(|a, b| a.name.cmp(&b.name));
    available
}

/// Distinct tags across all of an image's taggings, in tagging order.
#[must_use]
pub fn distinct_tags(taggings: &[(tagging::Model, tag::Model)]) -> Vec<tag::Model> {
    let mut seen = HashSet::new();
    taggings
        .iter()
        .filter(|(_, tag)| seen.insert(tag.id.clone()))
        .map(|(_, tag)| tag.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tag(id: &str, name: &str) -> tag::Model {
        tag::Model {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn tagged(tag: &tag::Model, staff_tag: bool) -> (tagging::Model, tag::Model) {
        (
            tagging::Model {
                id: format!("{}_{staff_tag}", tag.id),
                image_id: "img1".to_string(),
                tag_id: tag.id.clone(),
                staff_tag,
                created_at: Utc::now().into(),
            },
            tag.clone(),
        )
    }

    fn names(tags: &[tag::Model]) -> Vec<&str> {
        tags.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_partition_by_staff_flag() {
        let library = tag("t1", "library");
        let books = tag("t2", "books");
        let reading = tag("t3", "reading");
        let taggings = vec![
            tagged(&library, false),
            tagged(&books, false),
            tagged(&reading, true),
            tagged(&library, true),
        ];

        assert_eq!(names(&service_picked_tags(&taggings)), ["books", "library"]);
        assert_eq!(names(&staff_picked_tags(&taggings)), ["library", "reading"]);
    }

    #[test]
    fn test_partition_dedups_by_id() {
        let library = tag("t1", "library");
        let taggings = vec![tagged(&library, false), tagged(&library, false)];

        assert_eq!(service_picked_tags(&taggings).len(), 1);
        assert!(staff_picked_tags(&taggings).is_empty());
    }

    #[test]
    fn test_sort_is_case_sensitive() {
        let taggings = vec![
            tagged(&tag("t1", "apple"), true),
            tagged(&tag("t2", "Zebra"), true),
        ];

        assert_eq!(names(&staff_picked_tags(&taggings)), ["Zebra", "apple"]);
    }

    #[test]
    fn test_available_staff_tags() {
        let a = tag("a", "architecture");
        let b = tag("b", "books");
        let c = tag("c", "campus");
        let d = tag("d", "drawing");
        let all = vec![d.clone(), c.clone(), b.clone(), a.clone()];

        // b is a service tag only, c is both service and staff.
        let image_tags = vec![b.clone(), c.clone()];
        let staff_tags = vec![c.clone()];

        let available = available_staff_tags(all, &image_tags, &staff_tags);
        assert_eq!(names(&available), ["architecture", "campus", "drawing"]);
    }

    #[test]
    fn test_available_staff_tags_empty() {
        let a = tag("a", "architecture");
        let available = available_staff_tags(vec![a.clone()], &[a], &[]);
        assert!(available.is_empty());
    }

    #[test]
    fn test_distinct_tags() {
        let library = tag("t1", "library");
        let taggings = vec![
            tagged(&library, false),
            tagged(&library, true),
            tagged(&tag("t2", "books"), true),
        ];

        assert_eq!(names(&distinct_tags(&taggings)), ["library", "books"]);
    }
}
