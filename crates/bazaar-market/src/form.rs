// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submission dialogue state machine.
//!
//! A [`FormSession`] walks the seller through a fixed sequence of steps:
//! Photos -> Price -> Condition -> Description -> (Size) -> Contact -> City.
//! Each inbound input is classified into an [`EventKind`] and resolved through
//! [`route`], an explicit `(FormStep, EventKind)` table. A rejected input
//! leaves the session on the same step; no step is ever skipped.

use bazaar_config::model::ListingConfig;
use bazaar_core::{ChatId, MessageContent, PhotoRef, UserId};
use strum::{Display, EnumIter};

use crate::caption::{compose_caption, CaptionFields};
use crate::contact::{normalize_contact, Handle};
use crate::error::ValidationError;
use crate::listing::Listing;

/// Words that finish the photo step.
pub const DONE_WORDS: &[&str] = &["готово", "done"];

/// Words that mean "leave this optional field out".
pub const SKIP_WORDS: &[&str] = &["нет", "no", "none"];

fn matches_word(text: &str, words: &[&str]) -> bool {
    let normalized = text.trim().to_lowercase();
    words.iter().any(|w| *w == normalized)
}

pub fn is_done_word(text: &str) -> bool {
    matches_word(text, DONE_WORDS)
}

pub fn is_skip_word(text: &str) -> bool {
    matches_word(text, SKIP_WORDS)
}

/// Steps of the submission dialogue, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum FormStep {
    Photos,
    Price,
    Condition,
    Description,
    Size,
    Contact,
    City,
}

impl FormStep {
    /// The step after this one, or `None` when the form is complete.
    pub fn next(self, rules: &FormRules) -> Option<FormStep> {
        match self {
            FormStep::Photos => Some(FormStep::Price),
            FormStep::Price => Some(FormStep::Condition),
            FormStep::Condition => Some(FormStep::Description),
            FormStep::Description if rules.collect_size => Some(FormStep::Size),
            FormStep::Description | FormStep::Size => Some(FormStep::Contact),
            FormStep::Contact => Some(FormStep::City),
            FormStep::City => None,
        }
    }
}

/// Limits applied while collecting a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRules {
    pub max_photos: usize,
    pub max_description_chars: usize,
    pub caption_limit: usize,
    pub collect_size: bool,
}

impl Default for FormRules {
    fn default() -> Self {
        Self::from(&ListingConfig::default())
    }
}

impl From<&ListingConfig> for FormRules {
    fn from(config: &ListingConfig) -> Self {
        Self {
            max_photos: config.max_photos,
            max_description_chars: config.max_description_chars,
            caption_limit: config.caption_limit,
            collect_size: config.collect_size,
        }
    }
}

/// One inbound input for the dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    Photo(PhotoRef),
    Text(String),
    Unsupported,
}

impl From<&MessageContent> for FormInput {
    fn from(content: &MessageContent) -> Self {
        match content {
            MessageContent::Text(t) => FormInput::Text(t.clone()),
            MessageContent::Photo(p) => FormInput::Photo(p.clone()),
            MessageContent::Unsupported => FormInput::Unsupported,
        }
    }
}

/// Classification of an input, the column key of the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum EventKind {
    Photo,
    DoneKeyword,
    Text,
    Unsupported,
}

impl FormInput {
    pub fn kind(&self) -> EventKind {
        match self {
            FormInput::Photo(_) => EventKind::Photo,
            FormInput::Text(t) if is_done_word(t) => EventKind::DoneKeyword,
            FormInput::Text(_) => EventKind::Text,
            FormInput::Unsupported => EventKind::Unsupported,
        }
    }
}

/// What the dispatch table decides for a `(step, kind)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    AppendPhoto,
    FinishPhotos,
    /// Validate the text as the value of the current step.
    AcceptField,
    Reprompt(ValidationError),
}

/// The dialogue's transition table.
pub fn route(step: FormStep, kind: EventKind) -> Route {
    match (step, kind) {
        (FormStep::Photos, EventKind::Photo) => Route::AppendPhoto,
        (FormStep::Photos, EventKind::DoneKeyword) => Route::FinishPhotos,
        (FormStep::Photos, EventKind::Text | EventKind::Unsupported) => {
            Route::Reprompt(ValidationError::ExpectedPhoto)
        }
        (_, EventKind::Text | EventKind::DoneKeyword) => Route::AcceptField,
        (_, EventKind::Photo | EventKind::Unsupported) => {
            Route::Reprompt(ValidationError::ExpectedText)
        }
    }
}

/// Values collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub photos: Vec<PhotoRef>,
    pub price: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub size: Option<String>,
    pub contact: Option<Handle>,
    pub city: Option<String>,
}

/// Result of applying one accepted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    PhotoAdded { count: usize },
    Next(FormStep),
    Complete(Listing),
}

/// Dialogue state of one seller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSession {
    user: UserId,
    chat: ChatId,
    step: FormStep,
    draft: Draft,
}

impl FormSession {
    pub fn new(user: UserId, chat: ChatId) -> Self {
        Self {
            user,
            chat,
            step: FormStep::Photos,
            draft: Draft::default(),
        }
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn chat(&self) -> ChatId {
        self.chat
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Applies one input. On error the session stays where it was, except
    /// for an oversized caption, which sends the seller back to Description.
    pub fn apply(&mut self, input: FormInput, rules: &FormRules) -> Result<Advance, ValidationError> {
        match (route(self.step, input.kind()), input) {
            (Route::AppendPhoto, FormInput::Photo(photo)) => self.append_photo(photo, rules),
            (Route::FinishPhotos, _) => {
                if self.draft.photos.is_empty() {
                    return Err(ValidationError::NoPhotos);
                }
                Ok(self.advance(rules))
            }
            (Route::AcceptField, FormInput::Text(text)) => self.accept(&text, rules),
            (Route::Reprompt(error), _) => Err(error),
            // The table only emits AppendPhoto for photos and AcceptField for text.
            (_, _) => Err(ValidationError::ExpectedText),
        }
    }

    fn append_photo(&mut self, photo: PhotoRef, rules: &FormRules) -> Result<Advance, ValidationError> {
        if self.draft.photos.len() >= rules.max_photos {
            return Err(ValidationError::TooManyPhotos {
                max: rules.max_photos,
            });
        }
        self.draft.photos.push(photo);
        Ok(Advance::PhotoAdded {
            count: self.draft.photos.len(),
        })
    }

    fn accept(&mut self, text: &str, rules: &FormRules) -> Result<Advance, ValidationError> {
        let step = self.step;
        let trimmed = text.trim();
        let required = |value: &str| {
            if value.is_empty() {
                Err(ValidationError::EmptyField { step })
            } else {
                Ok(value.to_string())
            }
        };

        match step {
            FormStep::Photos => return Err(ValidationError::ExpectedPhoto),
            FormStep::Price => {
                let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
                self.draft.price = Some(required(&collapsed)?);
            }
            FormStep::Condition => {
                self.draft.condition = Some(required(&trimmed.to_lowercase())?);
            }
            FormStep::Description => {
                let description = required(trimmed)?;
                let len = description.chars().count();
                if len > rules.max_description_chars {
                    return Err(ValidationError::DescriptionTooLong {
                        len,
                        max: rules.max_description_chars,
                    });
                }
                self.draft.description = Some(description);
            }
            FormStep::Size => {
                let size = required(trimmed)?;
                self.draft.size = (!is_skip_word(&size)).then_some(size);
            }
            FormStep::Contact => {
                self.draft.contact =
                    Some(normalize_contact(trimmed).ok_or(ValidationError::InvalidContact)?);
            }
            FormStep::City => {
                self.draft.city = (!trimmed.is_empty() && !is_skip_word(trimmed))
                    .then(|| trimmed.to_string());
                return self.finish(rules).map(Advance::Complete);
            }
        }

        Ok(self.advance(rules))
    }

    fn advance(&mut self, rules: &FormRules) -> Advance {
        match self.step.next(rules) {
            Some(next) => {
                self.step = next;
                Advance::Next(next)
            }
            // Only City completes, and City never goes through here.
            None => Advance::Next(self.step),
        }
    }

    /// Assembles the caption and builds the listing.
    fn finish(&mut self, rules: &FormRules) -> Result<Listing, ValidationError> {
        let draft = &self.draft;
        let (Some(price), Some(condition), Some(description), Some(contact)) = (
            draft.price.as_deref(),
            draft.condition.as_deref(),
            draft.description.as_deref(),
            draft.contact.as_ref(),
        ) else {
            // Unreachable through the table; restart from the first missing field.
            self.step = self.first_missing_step();
            return Err(ValidationError::EmptyField { step: self.step });
        };

        let caption = compose_caption(&CaptionFields {
            price,
            condition,
            description,
            size: if rules.collect_size { draft.size.as_deref() } else { None },
            contact,
            city: draft.city.as_deref(),
        });

        Listing::new(self.user, self.chat, draft.photos.clone(), caption, rules).inspect_err(|err| {
            self.step = match err {
                ValidationError::NoPhotos | ValidationError::TooManyPhotos { .. } => FormStep::Photos,
                _ => FormStep::Description,
            };
        })
    }

    fn first_missing_step(&self) -> FormStep {
        let d = &self.draft;
        if d.photos.is_empty() {
            FormStep::Photos
        } else if d.price.is_none() {
            FormStep::Price
        } else if d.condition.is_none() {
            FormStep::Condition
        } else if d.description.is_none() {
            FormStep::Description
        } else {
            FormStep::Contact
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    fn text(s: &str) -> FormInput {
        FormInput::Text(s.to_string())
    }

    fn photo(i: usize) -> FormInput {
        FormInput::Photo(PhotoRef(format!("photo-{i}")))
    }

    fn session() -> FormSession {
        FormSession::new(UserId(10), ChatId(10))
    }

    fn no_size() -> FormRules {
        FormRules {
            collect_size: false,
            ..FormRules::default()
        }
    }

    /// Drives a session to the City step with two photos.
    fn at_city(rules: &FormRules) -> FormSession {
        let mut s = session();
        s.apply(photo(0), rules).unwrap();
        s.apply(photo(1), rules).unwrap();
        s.apply(text("готово"), rules).unwrap();
        s.apply(text("100"), rules).unwrap();
        s.apply(text("new"), rules).unwrap();
        s.apply(text("shirt"), rules).unwrap();
        if rules.collect_size {
            s.apply(text("нет"), rules).unwrap();
        }
        s.apply(text("myuser"), rules).unwrap();
        assert_eq!(s.step(), FormStep::City);
        s
    }

    #[test]
    fn table_covers_every_pair() {
        for step in FormStep::iter() {
            for kind in EventKind::iter() {
                let route = route(step, kind);
                match (step, kind) {
                    (FormStep::Photos, EventKind::Photo) => assert_eq!(route, Route::AppendPhoto),
                    (FormStep::Photos, EventKind::DoneKeyword) => {
                        assert_eq!(route, Route::FinishPhotos)
                    }
                    (FormStep::Photos, _) => {
                        assert_eq!(route, Route::Reprompt(ValidationError::ExpectedPhoto))
                    }
                    (_, EventKind::Text | EventKind::DoneKeyword) => {
                        assert_eq!(route, Route::AcceptField)
                    }
                    (_, _) => assert_eq!(route, Route::Reprompt(ValidationError::ExpectedText)),
                }
            }
        }
    }

    #[test]
    fn step_order_with_and_without_size() {
        let with = FormRules::default();
        let order: Vec<_> = std::iter::successors(Some(FormStep::Photos), |s| s.next(&with)).collect();
        assert_eq!(
            order,
            vec![
                FormStep::Photos,
                FormStep::Price,
                FormStep::Condition,
                FormStep::Description,
                FormStep::Size,
                FormStep::Contact,
                FormStep::City,
            ]
        );

        let without = no_size();
        let order: Vec<_> =
            std::iter::successors(Some(FormStep::Photos), |s| s.next(&without)).collect();
        assert!(!order.contains(&FormStep::Size));
        assert_eq!(order.len(), 6);
    }

    #[test]
    fn done_keyword_is_case_insensitive() {
        assert!(is_done_word("  ГОТОВО "));
        assert!(is_done_word("Done"));
        assert!(!is_done_word("готово!"));
    }

    #[test]
    fn done_without_photos_reprompts() {
        let mut s = session();
        let rules = FormRules::default();
        assert_eq!(s.apply(text("готово"), &rules), Err(ValidationError::NoPhotos));
        assert_eq!(s.step(), FormStep::Photos);
    }

    #[test]
    fn sixth_photo_rejected() {
        let mut s = session();
        let rules = FormRules::default();
        for i in 0..5 {
            assert_eq!(
                s.apply(photo(i), &rules),
                Ok(Advance::PhotoAdded { count: i + 1 })
            );
        }
        assert_eq!(
            s.apply(photo(5), &rules),
            Err(ValidationError::TooManyPhotos { max: 5 })
        );
        assert_eq!(s.draft().photos.len(), 5);
        assert_eq!(s.step(), FormStep::Photos);
    }

    #[test]
    fn text_during_photos_and_photo_during_text_steps_reprompt() {
        let mut s = session();
        let rules = FormRules::default();
        assert_eq!(s.apply(text("hello"), &rules), Err(ValidationError::ExpectedPhoto));
        s.apply(photo(0), &rules).unwrap();
        s.apply(text("done"), &rules).unwrap();
        assert_eq!(s.apply(photo(1), &rules), Err(ValidationError::ExpectedText));
        assert_eq!(s.apply(FormInput::Unsupported, &rules), Err(ValidationError::ExpectedText));
        assert_eq!(s.step(), FormStep::Price);
    }

    #[test]
    fn empty_fields_stay_on_step() {
        let mut s = session();
        let rules = FormRules::default();
        s.apply(photo(0), &rules).unwrap();
        s.apply(text("готово"), &rules).unwrap();
        assert_eq!(
            s.apply(text("   "), &rules),
            Err(ValidationError::EmptyField { step: FormStep::Price })
        );
        assert_eq!(s.step(), FormStep::Price);
        s.apply(text(" 2  990 "), &rules).unwrap();
        assert_eq!(s.draft().price.as_deref(), Some("2 990"));
        assert_eq!(
            s.apply(text(""), &rules),
            Err(ValidationError::EmptyField { step: FormStep::Condition })
        );
        s.apply(text(" Б/У "), &rules).unwrap();
        assert_eq!(s.draft().condition.as_deref(), Some("б/у"));
    }

    #[test]
    fn long_description_rejected() {
        let rules = FormRules {
            max_description_chars: 10,
            ..FormRules::default()
        };
        let mut s = session();
        s.apply(photo(0), &rules).unwrap();
        s.apply(text("готово"), &rules).unwrap();
        s.apply(text("1"), &rules).unwrap();
        s.apply(text("new"), &rules).unwrap();
        assert_eq!(
            s.apply(text("слишком длинное описание"), &rules),
            Err(ValidationError::DescriptionTooLong { len: 24, max: 10 })
        );
        assert_eq!(s.step(), FormStep::Description);
    }

    #[test]
    fn invalid_contact_stays_on_contact() {
        let rules = no_size();
        let mut s = session();
        s.apply(photo(0), &rules).unwrap();
        for value in ["готово", "1", "new", "shirt"] {
            s.apply(text(value), &rules).unwrap();
        }
        assert_eq!(s.step(), FormStep::Contact);
        assert_eq!(s.apply(text("my user"), &rules), Err(ValidationError::InvalidContact));
        assert_eq!(s.step(), FormStep::Contact);
        assert_eq!(s.apply(text("t.me/seller"), &rules), Ok(Advance::Next(FormStep::City)));
        assert_eq!(s.draft().contact.as_ref().map(Handle::as_str), Some("@seller"));
    }

    #[test]
    fn city_sentinel_omitted_from_caption() {
        let rules = no_size();
        let Ok(Advance::Complete(listing)) = at_city(&rules).apply(text("Нет"), &rules) else {
            panic!("expected completion");
        };
        assert!(!listing.caption().contains("Город"));
        assert!(listing.caption().ends_with("Купить:@myuser"));
    }

    #[test]
    fn city_included_verbatim() {
        let rules = no_size();
        let Ok(Advance::Complete(listing)) =
            at_city(&rules).apply(text("  Санкт-Петербург "), &rules)
        else {
            panic!("expected completion");
        };
        assert!(listing.caption().ends_with("\nГород:Санкт-Петербург"));
    }

    #[test]
    fn size_step_folds_into_description() {
        let rules = FormRules::default();
        let mut s = session();
        s.apply(photo(0), &rules).unwrap();
        for value in ["готово", "1", "new", "футболка"] {
            s.apply(text(value), &rules).unwrap();
        }
        assert_eq!(s.step(), FormStep::Size);
        s.apply(text("M"), &rules).unwrap();
        s.apply(text("@seller"), &rules).unwrap();
        let Ok(Advance::Complete(listing)) = s.apply(text("no"), &rules) else {
            panic!("expected completion");
        };
        assert!(listing.caption().contains("Описание:футболка размер M\n"));
    }

    #[test]
    fn oversized_caption_returns_to_description() {
        let rules = FormRules {
            caption_limit: 60,
            collect_size: false,
            ..FormRules::default()
        };
        let mut s = session();
        s.apply(photo(0), &rules).unwrap();
        for value in [
            "готово",
            "100",
            "new",
            "очень подробное описание товара с деталями",
            "myuser",
        ] {
            s.apply(text(value), &rules).unwrap();
        }
        let err = s.apply(text("Москва"), &rules).unwrap_err();
        assert!(matches!(err, ValidationError::CaptionTooLong { max: 60, .. }));
        assert_eq!(s.step(), FormStep::Description);

        // A shorter description goes through the remaining steps again.
        assert_eq!(s.apply(text("кофта"), &rules), Ok(Advance::Next(FormStep::Contact)));
        s.apply(text("myuser"), &rules).unwrap();
        assert!(matches!(s.apply(text("нет"), &rules), Ok(Advance::Complete(_))));
    }

    #[test]
    fn emoji_description_within_char_limit_can_overflow_caption() {
        let rules = no_size();
        let description = "😀".repeat(rules.max_description_chars);
        let mut s = session();
        s.apply(photo(0), &rules).unwrap();
        for value in ["готово", "100", "new", description.as_str(), "myuser"] {
            s.apply(text(value), &rules).unwrap();
        }
        let err = s.apply(text("нет"), &rules).unwrap_err();
        let ValidationError::CaptionTooLong { len, max } = err else {
            panic!("expected caption overflow, got {err:?}");
        };
        assert!(len > 2 * rules.max_description_chars);
        assert_eq!(max, rules.caption_limit);
        assert_eq!(s.step(), FormStep::Description);
    }

    #[derive(Debug, Clone)]
    enum Step {
        Photo,
        Done,
        Text,
    }

    fn any_step() -> impl Strategy<Value = Step> {
        prop_oneof![Just(Step::Photo), Just(Step::Done), Just(Step::Text)]
    }

    proptest! {
        #[test]
        fn never_completes_with_invalid_photo_count(steps in prop::collection::vec(any_step(), 0..40)) {
            let rules = FormRules::default();
            let mut s = session();
            for (i, step) in steps.into_iter().enumerate() {
                let input = match step {
                    Step::Photo => photo(i),
                    Step::Done => text("готово"),
                    Step::Text => text("myuser"),
                };
                let result = s.apply(input, &rules);
                prop_assert!(s.draft().photos.len() <= rules.max_photos);
                if let Ok(Advance::Complete(listing)) = result {
                    prop_assert!(!listing.photos().is_empty());
                    prop_assert!(listing.photos().len() <= rules.max_photos);
                    break;
                }
            }
        }
    }
}
