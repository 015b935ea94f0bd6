//! User-facing texts.

use cinemabot_db::models::TopSearch;

pub const GREETING: &str = "Привет! Я cinema bot. Чтобы найти фильм, напиши его название, \
а я попробую его найти.\nЕсли запутался, напиши команду /help";

pub const HELP: &str = "Привет!\n\n\
Я поддерживаю следующие команды:\n\
/start - Начать использование бота\n\
/help - Получить справку о доступных командах\n\
/history - История поиска\n\
/stats - Статистика поиска\n\
/moviebd_big_experimental <название фильма> - много данных о похожих фильмах и ссылки на них\n\n\
Просто напиши мне название фильма или сериала, и я постараюсь найти для тебя информацию о нем.";

pub const HISTORY_EMPTY: &str = "История поиска пуста.";

pub const NOTHING_FOUND: &str = "Nothing found. Try to write exactly the same article of film";

pub const LOOKUP_MISSING_ARGUMENT: &str = "Вы не ввели ассоциацию фильма";

pub const LOOKUP_FOOTER: &str = "\n\nThat all connected to the film in the moviedb";

pub const STORAGE_UNAVAILABLE: &str = "История сейчас недоступна, попробуйте позже.";

pub fn history(titles: &[String]) -> String {
    if titles.is_empty() {
        return HISTORY_EMPTY.to_string();
    }

    let mut out = String::from("История поиска:\n");
    for title in titles {
        out.push_str("- ");
        out.push_str(title);
        out.push('\n');
    }
    out
}

pub fn stats(top: &[TopSearch], limit: u32) -> String {
    let mut out = format!("Топ-{limit} поисковых запросов:\n");
    for entry in top {
        out.push_str(&format!("{}: {} раз(а)\n", entry.film_name, entry.count));
    }
    out
}
