// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caption assembly for finished submissions.

use std::borrow::Cow;

use crate::contact::Handle;

/// Words that already count as a size mention inside a description.
const SIZE_WORDS: &[&str] = &["размер", "size"];

/// Labeled fields in caption order.
#[derive(Debug, Clone, Copy)]
pub struct CaptionFields<'a> {
    pub price: &'a str,
    pub condition: &'a str,
    pub description: &'a str,
    pub size: Option<&'a str>,
    pub contact: &'a Handle,
    pub city: Option<&'a str>,
}

/// Builds the caption: price, condition, description (with the size folded
/// in), contact, and the city last when present.
pub fn compose_caption(fields: &CaptionFields<'_>) -> String {
    let mut caption = format!(
        "Цена:{}\nСостояние:{}\nОписание:{}\nКупить:{}",
        fields.price,
        fields.condition,
        describe(fields.description, fields.size),
        fields.contact,
    );
    if let Some(city) = fields.city {
        caption.push_str("\nГород:");
        caption.push_str(city);
    }
    caption
}

/// Appends the size unless the description already talks about it.
fn describe<'a>(description: &'a str, size: Option<&str>) -> Cow<'a, str> {
    match size {
        Some(size) if !mentions_size(description) => {
            Cow::Owned(format!("{description} размер {size}"))
        }
        _ => Cow::Borrowed(description),
    }
}

fn mentions_size(description: &str) -> bool {
    let lower = description.to_lowercase();
    SIZE_WORDS.iter().any(|w| lower.contains(w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::normalize_contact;

    fn fields<'a>(contact: &'a Handle) -> CaptionFields<'a> {
        CaptionFields {
            price: "100",
            condition: "new",
            description: "shirt",
            size: None,
            contact,
            city: None,
        }
    }

    #[test]
    fn labeled_fields_in_fixed_order() {
        let contact = normalize_contact("myuser").unwrap();
        assert_eq!(
            compose_caption(&fields(&contact)),
            "Цена:100\nСостояние:new\nОписание:shirt\nКупить:@myuser"
        );
    }

    #[test]
    fn city_line_last_when_present() {
        let contact = normalize_contact("myuser").unwrap();
        let caption = compose_caption(&CaptionFields {
            city: Some("Москва"),
            ..fields(&contact)
        });
        assert!(caption.ends_with("Купить:@myuser\nГород:Москва"));
    }

    #[test]
    fn size_appended_unless_mentioned() {
        let contact = normalize_contact("u").unwrap();
        let caption = compose_caption(&CaptionFields {
            size: Some("46"),
            ..fields(&contact)
        });
        assert!(caption.contains("Описание:shirt размер 46\n"));

        let caption = compose_caption(&CaptionFields {
            description: "Футболка Represent, Размер 46",
            size: Some("46"),
            ..fields(&contact)
        });
        assert!(caption.contains("Описание:Футболка Represent, Размер 46\n"));
    }
}
