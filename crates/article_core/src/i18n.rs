use crate::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Ukrainian,
    English,
    Russian,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Ukrainian, Language::English, Language::Russian];

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "uk" | "ua" => Some(Language::Ukrainian),
            "en" => Some(Language::English),
            "ru" => Some(Language::Russian),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Ukrainian => "uk",
            Language::English => "en",
            Language::Russian => "ru",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::Ukrainian => "Українська (Ukrainian)",
            Language::English => "English",
            Language::Russian => "Русский (Russian)",
        }
    }
}

/// Static interface texts for one language.
#[derive(Debug, PartialEq, Eq)]
pub struct Labels {
    pub wiki_url: &'static str,
    pub username: &'static str,
    pub password: &'static str,
    pub articles: &'static str,
    pub prefix: &'static str,
    pub content: &'static str,
    pub delay: &'static str,
    pub created: &'static str,
    pub failed: &'static str,
    pub error: &'static str,
    pub starting: &'static str,
    pub stopping: &'static str,
    pub finished: &'static str,
    pub cancelled: &'static str,
    pub idle: &'static str,
    pub running: &'static str,
    pub aborted: &'static str,
}

impl Labels {
    pub fn session(&self, session: SessionState) -> &'static str {
        match session {
            SessionState::Idle => self.idle,
            SessionState::Running => self.running,
            SessionState::Stopping => self.stopping,
            SessionState::Finished => self.finished,
            SessionState::Cancelled => self.cancelled,
            SessionState::Failed => self.aborted,
        }
    }
}

static UKRAINIAN: Labels = Labels {
    wiki_url: "🌐 URL вікі:",
    username: "👤 Ім'я користувача:",
    password: "🔐 Пароль:",
    articles: "📊 Кількість статей:",
    prefix: "🏷️ Префікс статті:",
    content: "📝 Шаблон вмісту:",
    delay: "⏱️ Затримка між статтями (секунди):",
    created: "Створено",
    failed: "Не вдалося створити",
    error: "Помилка",
    starting: "Початок створення статей",
    stopping: "Зупинка…",
    finished: "Готово",
    cancelled: "Зупинено",
    idle: "Очікування",
    running: "Виконується",
    aborted: "Аварійне завершення",
};

static ENGLISH: Labels = Labels {
    wiki_url: "🌐 Wiki URL:",
    username: "👤 Username:",
    password: "🔐 Password:",
    articles: "📊 Number of Articles:",
    prefix: "🏷️ Article Prefix:",
    content: "📝 Content Template:",
    delay: "⏱️ Delay between articles (seconds):",
    created: "Created",
    failed: "Failed to create",
    error: "Error",
    starting: "Starting article creation",
    stopping: "Stopping…",
    finished: "Done",
    cancelled: "Stopped",
    idle: "Idle",
    running: "Running",
    aborted: "Aborted",
};

static RUSSIAN: Labels = Labels {
    wiki_url: "🌐 URL вики:",
    username: "👤 Имя пользователя:",
    password: "🔐 Пароль:",
    articles: "📊 Количество статей:",
    prefix: "🏷️ Префикс статьи:",
    content: "📝 Шаблон содержимого:",
    delay: "⏱️ Задержка между статьями (секунды):",
    created: "Создано",
    failed: "Не удалось создать",
    error: "Ошибка",
    starting: "Начало создания статей",
    stopping: "Остановка…",
    finished: "Готово",
    cancelled: "Остановлено",
    idle: "Ожидание",
    running: "Выполняется",
    aborted: "Аварийное завершение",
};

pub fn labels(language: Language) -> &'static Labels {
    match language {
        Language::Ukrainian => &UKRAINIAN,
        Language::English => &ENGLISH,
        Language::Russian => &RUSSIAN,
    }
}
