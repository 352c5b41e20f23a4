// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing message texts.

use bazaar_core::{ChatId, Keyboard, UserId};

use crate::error::{ProtocolError, ValidationError};
use crate::form::{FormRules, FormStep};
use crate::listing::PostId;

pub const SELL_BUTTON: &str = "📦 Разместить объявление";
pub const INFO_BUTTON: &str = "ℹ️ Инфо";

pub const GREETING: &str =
    "Привет! 👋 Это бот WM.\nХочешь разместить объявление в канале?\nВыберите действие:";

pub const RULES: &str = "📌 Правила размещения (обязательны):\n\n\
• Фото — от 1 до 5 шт. (чёткие)\n\
• Цена — финальная стоимость (например: 2 990)\n\
• Состояние — новое / б/у\n\
• Описание и размер в одной строке: например: Футболка Represent размер 46\n\
• Контакт — обязательно в формате @username или ссылка на t.me/username\n\
• Город — опционально\n\n\
🔸 Мы не размещаем ссылки на телеграм-каналы/магазины.\n\
🚨 Размещение — бесплатно.";

pub const CANCELLED: &str = "Действие отменено.";
pub const IDLE_HINT: &str = "Чтобы разместить объявление, нажми /sell.";
pub const PRIVATE_ONLY: &str = "Объявления принимаются только в личных сообщениях с ботом.";

pub const SUBMITTED: &str = "✅ Твоё объявление отправлено на модерацию.";
pub const SUBMIT_FAILED: &str =
    "Не удалось отправить объявление на модерацию. Пришли город ещё раз, чтобы повторить.";

pub const NOT_A_MODERATOR: &str = "У тебя нет прав модератора";
pub const ALREADY_PROCESSED: &str = "Пост не найден или уже обработан";
pub const UNKNOWN_ACTION: &str = "Неизвестное действие";
pub const PUBLISH_FAILED: &str = "Не удалось опубликовать объявление, попробуй ещё раз";
pub const ACTION_FAILED: &str = "Не удалось выполнить действие, попробуй ещё раз";

pub const PUBLISHED: &str = "Объявление опубликовано ✅";
pub const REJECTED: &str = "Отклонено ❌";
pub const REASON_REQUESTED: &str = "Напиши причину ответом на сообщение бота";
pub const PROMPT_CLOSED: &str = "Объявление уже обработано, причина больше не нужна.";
pub const REJECTION_DONE: &str = "Отклонено ❌ Автор получил причину.";
pub const REJECTION_UNDELIVERED: &str = "Отклонено ❌ Но автору не удалось доставить сообщение.";

pub const APPROVED_AUTHOR: &str = "Ваше объявление было одобрено ✅";

/// Persistent keyboard shown on /start.
pub fn main_keyboard() -> Keyboard {
    Keyboard::Reply(vec![SELL_BUTTON.to_string(), INFO_BUTTON.to_string()])
}

/// Prompt asking for the value of `step`.
pub fn step_prompt(step: FormStep, rules: &FormRules) -> String {
    match step {
        FormStep::Photos => format!(
            "Отправь фото товара (от 1 до {}). Когда закончишь — напиши «готово».",
            rules.max_photos
        ),
        FormStep::Price => "Укажи цену.".into(),
        FormStep::Condition => "Состояние (новое / б/у).".into(),
        FormStep::Description => "Описание (пример: Футболка размер: x).".into(),
        FormStep::Size => "Размер (или напиши «нет»).".into(),
        FormStep::Contact => "Контакт (обязательно @username или t.me/username).".into(),
        FormStep::City => "Укажи город (или напиши «нет»).".into(),
    }
}

pub fn photo_progress(count: usize, rules: &FormRules) -> String {
    format!(
        "Фото приняты ({count}/{}). Пришли ещё или напиши «готово».",
        rules.max_photos
    )
}

/// Corrective notice for a rejected input, followed by the prompt of the
/// step the dialogue now waits on.
pub fn validation_notice(error: &ValidationError, step: FormStep, rules: &FormRules) -> String {
    let notice = match error {
        ValidationError::EmptyField { .. } => "Поле не может быть пустым.".to_string(),
        ValidationError::DescriptionTooLong { len, max } => {
            format!("Описание слишком длинное ({len} символов, максимум {max}).")
        }
        ValidationError::TooManyPhotos { max } => {
            return format!("Можно загрузить максимум {max} фото ❗ Напиши «готово», чтобы продолжить.");
        }
        ValidationError::NoPhotos => {
            return "Ты не отправил ни одного фото. Отправь фото или нажми /cancel.".into();
        }
        ValidationError::ExpectedPhoto => "Сейчас нужно отправить фото.".to_string(),
        ValidationError::ExpectedText => "Сейчас нужен текстовый ответ.".to_string(),
        ValidationError::InvalidContact => {
            "Контакт должен быть в формате @username или ссылка t.me/username.".to_string()
        }
        ValidationError::CaptionTooLong { len, max } => format!(
            "Объявление получилось слишком длинным ({len} символов, максимум {max}). Сократи описание."
        ),
        ValidationError::EmptyReason => "Причина не может быть пустой.".to_string(),
        ValidationError::ReasonTooLong { len, max } => {
            format!("Причина слишком длинная ({len} символов, максимум {max}).")
        }
    };
    format!("{notice}\n{}", step_prompt(step, rules))
}

/// Notice for an admin whose reason reply could not be used.
pub fn reason_notice(error: &ValidationError) -> String {
    match error {
        ValidationError::ReasonTooLong { len, max } => format!(
            "Причина слишком длинная ({len} символов, максимум {max}). Ответь на сообщение бота ещё раз."
        ),
        _ => "Причина не может быть пустой. Ответь на сообщение бота текстом.".into(),
    }
}

pub fn protocol_notice(error: &ProtocolError) -> String {
    match error {
        ProtocolError::WrongAdmin { owner } => {
            format!("Причину для этого объявления указывает модератор {owner}.")
        }
        ProtocolError::UnknownPrompt | ProtocolError::MalformedToken(_) => UNKNOWN_ACTION.into(),
    }
}

pub fn review_prompt(post_id: PostId) -> String {
    format!("ℹ️ Новое объявление на модерации (id: {post_id})")
}

pub fn reason_request(post_id: PostId, admin: UserId) -> String {
    format!("✍️ Модератор {admin}, ответь на это сообщение причиной отклонения (id: {post_id}).")
}

pub fn approved_status(post_id: PostId, admin: UserId) -> String {
    format!("✅ Опубликовано (id: {post_id}), модератор {admin}")
}

pub fn rejected_status(post_id: PostId, admin: UserId, reason: Option<&str>) -> String {
    match reason {
        Some(reason) => {
            format!("❌ Отклонено (id: {post_id}), модератор {admin}\nПричина: {reason}")
        }
        None => format!("❌ Отклонено (id: {post_id}), модератор {admin}"),
    }
}

pub fn rejected_author(reason: Option<&str>) -> String {
    match reason {
        Some(reason) => format!("Ваше объявление было отклонено ❌\nПричина: {reason}"),
        None => "Ваше объявление было отклонено ❌".into(),
    }
}

pub fn rejection_log(post_id: PostId, admin: UserId, author: UserId, reason: &str) -> String {
    format!("📝 Отклонено объявление {post_id} (автор {author}) модератором {admin}: {reason}")
}

pub fn whoami(chat: ChatId, user: UserId) -> String {
    format!("chat_id: {chat}\nuser_id: {user}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_end_with_step_prompt() {
        let rules = FormRules::default();
        let text = validation_notice(&ValidationError::InvalidContact, FormStep::Contact, &rules);
        assert!(text.ends_with(&step_prompt(FormStep::Contact, &rules)));
    }

    #[test]
    fn caption_notice_points_back_to_description() {
        let rules = FormRules::default();
        let text = validation_notice(
            &ValidationError::CaptionTooLong { len: 1100, max: 1024 },
            FormStep::Description,
            &rules,
        );
        assert!(text.contains("1100"));
        assert!(text.ends_with("Описание (пример: Футболка размер: x)."));
    }

    #[test]
    fn rejection_reason_reaches_author_text() {
        assert!(rejected_author(Some("размытые фото")).ends_with("Причина: размытые фото"));
        assert_eq!(rejected_author(None), "Ваше объявление было отклонено ❌");
    }
}
