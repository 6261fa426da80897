use crate::config::TgConfig;
use crate::telegram::{KeyboardMarkup, ResponseBody};

const START: &str = "/start";
const FIND: &str = "/find";
const FIND_BOOK: &str = "Книга";
const FIND_MOVIE: &str = "Фильм";

const FIND_PROMPT: &str = "Выберите, чем вы хотите занять себя сейчас!";
const BOOK_GENRE_PROMPT: &str = "Выберите жанр книги!";
const MOVIE_GENRE_PROMPT: &str = "Выберите жанр фильма!";

/// Book genres, in keyboard order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookGenre {
    Psychology,
    History,
    Prose,
    Poetry,
}

impl BookGenre {
    pub const ALL: [BookGenre; 4] = [
        BookGenre::Psychology,
        BookGenre::History,
        BookGenre::Prose,
        BookGenre::Poetry,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BookGenre::Psychology => "Психология",
            BookGenre::History => "История",
            BookGenre::Prose => "Проза",
            BookGenre::Poetry => "Поэзия",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            BookGenre::Psychology => "З. Фрейд. Введение в психоанализ",
            BookGenre::History => "А. В. Яценко. Из варяг в греки",
            BookGenre::Prose => "Х. Мулиш. Расплата",
            BookGenre::Poetry => "М. Винтерс. Леонардо да Винчи",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.label() == label)
    }
}

/// Movie genres, in keyboard order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieGenre {
    Horror,
    Adventure,
    Detective,
    Fantasy,
}

impl MovieGenre {
    pub const ALL: [MovieGenre; 4] = [
        MovieGenre::Horror,
        MovieGenre::Adventure,
        MovieGenre::Detective,
        MovieGenre::Fantasy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MovieGenre::Horror => "Ужасы",
            MovieGenre::Adventure => "Приключение",
            MovieGenre::Detective => "Детективы",
            MovieGenre::Fantasy => "Фантастика",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            MovieGenre::Horror => "Астрал",
            MovieGenre::Adventure => "Чупа",
            MovieGenre::Detective => "Убийство в Париже",
            MovieGenre::Fantasy => "Самаритянин",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.label() == label)
    }
}

/// Every input the bot reacts to. Matching is exact: no trimming, no case folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Find,
    FindBook,
    FindMovie,
    Book(BookGenre),
    Movie(MovieGenre),
    Unknown,
}

impl Command {
    pub fn parse(text: &str) -> Self {
        match text {
            START => Command::Start,
            FIND => Command::Find,
            FIND_BOOK => Command::FindBook,
            FIND_MOVIE => Command::FindMovie,
            other => {
                if let Some(genre) = BookGenre::from_label(other) {
                    Command::Book(genre)
                } else if let Some(genre) = MovieGenre::from_label(other) {
                    Command::Movie(genre)
                } else {
                    Command::Unknown
                }
            }
        }
    }

    /// Build the reply for `chat_id`. Greeting and fallback texts come from config.
    pub fn reply(self, chat_id: i64, tg: &TgConfig) -> ResponseBody {
        let (text, reply_markup) = match self {
            Command::Start => (tg.hello_message.clone(), None),
            Command::Find => (
                FIND_PROMPT.to_string(),
                Some(KeyboardMarkup::single_row(&[FIND_BOOK, FIND_MOVIE])),
            ),
            Command::FindBook => (
                BOOK_GENRE_PROMPT.to_string(),
                Some(KeyboardMarkup::single_row(
                    &BookGenre::ALL.map(BookGenre::label),
                )),
            ),
            Command::FindMovie => (
                MOVIE_GENRE_PROMPT.to_string(),
                Some(KeyboardMarkup::single_row(
                    &MovieGenre::ALL.map(MovieGenre::label),
                )),
            ),
            Command::Book(genre) => (format!("Почитайте {}", genre.recommendation()), None),
            Command::Movie(genre) => (format!("Посмотрите {}", genre.recommendation()), None),
            Command::Unknown => (tg.unknown_message.clone(), None),
        };

        ResponseBody {
            chat_id,
            text,
            reply_markup,
        }
    }
}
