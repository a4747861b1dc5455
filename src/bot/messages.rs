use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::api::weather::WeatherReport;

pub const HELP: &str = "Привет! Вот что я умею:\n\n\
    !п [город] — погода, например !п Лондон\n\
    !к [из] [в] [сумма] — курс валют, например !к RUB USD 100\n\
    /Картинка — случайный котик\n\
    !p q Вопрос? — начать опрос, затем !p a Да Нет и !p для отправки";

pub const UNKNOWN_COMMAND: &str =
    "Не понимаю эту команду, опрос сброшен. Введите /start, чтобы увидеть список команд.";

pub const POLL_QUESTION_SAVED: &str =
    "Вопрос записан. Введите ответы через пробел !p a Да Нет Наверное";
pub const POLL_ASK_QUESTION: &str = "Для создания опроса введите !p q Ваш Вопрос?";
pub const POLL_ASK_ANSWERS: &str = "Введите ответы через пробел !p a Да Нет Наверное";
pub const POLL_ASK_DISPATCH: &str = "Ответы записаны. Введите !p для создания опроса.";
pub const POLL_EMPTY_QUESTION: &str = "Вопрос не может быть пустым: !p q Ваш Вопрос?";
pub const POLL_ANSWER_COUNT: &str = "Нужно от 2 до 10 вариантов ответа: !p a Да Нет";
pub const POLL_QUESTION_TOO_LONG: &str = "Вопрос длиннее 300 символов, сократите его: !p q Ваш Вопрос?";
pub const POLL_ANSWER_TOO_LONG: &str = "Каждый ответ должен быть не длиннее 100 символов: !p a Да Нет";
pub const POLL_USAGE: &str = "Неизвестная команда опроса. Используйте !p q, !p a или !p";

pub fn weather(report: &WeatherReport) -> String {
    format!(
        "Сейчас в г. {}\n\
         Температура:\t{:.2}°C\n\
         Влажность:\t{}%\n\
         Облачность:\t{}\n\n\
         Чтобы узнать погоду в своём городе можно указать его вручную, например !п Нью-Йорк",
        report.city, report.temperature_c, report.humidity, report.description
    )
}

pub fn conversion(amount: &str, from: &str, result: f64, to: &str) -> String {
    format!(
        "{amount} {from} = {result} {to}\n\n\
         Можно использовать вручную, например, !к RUB USD 100"
    )
}

/// Persistent menu shown under every reply.
pub fn menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new("/Погода")],
        vec![KeyboardButton::new("/Курс")],
        vec![KeyboardButton::new("/Картинка")],
        vec![KeyboardButton::new("/Опрос")],
    ])
    .resize_keyboard()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_text() {
        let text = weather(&WeatherReport {
            city: "London".into(),
            temperature_c: 14.856,
            humidity: 72.0,
            description: "пасмурно".into(),
        });
        assert!(text.contains("London"));
        assert!(text.contains("14.86°C"));
        assert!(text.contains("72%"));
        assert!(text.contains("пасмурно"));
    }

    #[test]
    fn test_conversion_text() {
        let text = conversion("100", "RUB", 1.08, "USD");
        assert!(text.starts_with("100 RUB = 1.08 USD"));
    }
}
