use std::collections::HashMap;

const FALLBACK_LANG: &str = "en-US";

// Simple in-memory translations
pub struct Translations {
    strings: HashMap<&'static str, &'static str>,
}

impl Translations {
    fn from_pairs(pairs: &[(&'static str, &'static str)]) -> Self {
        Self {
            strings: pairs.iter().copied().collect(),
        }
    }

    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.strings.get(key).copied()
    }
}

const EN_US: &[(&str, &str)] = &[
    ("app-title", "yt-dlp Downloader"),
    ("url-label", "Enter video URL:"),
    ("url-placeholder", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
    ("output-folder-label", "Output folder (optional, downloads to \"output\" if not specified):"),
    ("browse-button", "Browse..."),
    ("media-kind-label", "Select output type:"),
    ("media-audio", "Audio"),
    ("media-video", "Video"),
    ("audio-format-label", "Audio format:"),
    ("video-format-label", "Video format:"),
    ("rename-label", "Rename the file (optional):"),
    ("rename-placeholder", "my-custom-name"),
    ("advanced-options", "Advanced options"),
    ("start-time-label", "Start time (downloads from the start if not specified):"),
    ("end-time-label", "End time (downloads until the end if not specified):"),
    ("time-placeholder", "00:00:00"),
    ("download-button", "Download"),
    ("cancel-button", "Cancel"),
    ("ok-button", "OK"),
    ("status-ready", "Ready"),
    ("status-downloading", "Downloading..."),
    ("status-complete", "Download complete"),
    ("status-cancelled", "Download cancelled"),
    ("network-error-title", "Network Error"),
    ("network-error-message", "Please check your internet connection and try again."),
    ("url-empty-title", "URL Field Empty"),
    ("url-empty-message", "You must provide a valid URL."),
    ("time-format-title", "Invalid Time"),
    ("time-format-message", "Start and end times must use the HH:MM:SS format."),
    ("time-range-title", "Invalid Time Range"),
    ("time-range-message", "The start time must be earlier than the end time."),
    ("invalid-url-title", "Invalid URL"),
    ("invalid-url-message", "The provided URL is not valid. Please enter a valid URL."),
    ("download-error-title", "Error"),
    ("download-error-message", "An error occurred while downloading."),
    ("download-complete-title", "Done"),
    ("download-complete-message", "The download finished successfully."),
];

const ES_ES: &[(&str, &str)] = &[
    ("app-title", "Descargador yt-dlp"),
    ("url-label", "URL del video:"),
    ("output-folder-label", "Carpeta de salida (opcional, se usa \"output\" si no se indica):"),
    ("browse-button", "Examinar..."),
    ("media-kind-label", "Tipo de salida:"),
    ("media-audio", "Audio"),
    ("media-video", "Video"),
    ("audio-format-label", "Formato de audio:"),
    ("video-format-label", "Formato de video:"),
    ("rename-label", "Renombrar el archivo (opcional):"),
    ("rename-placeholder", "mi-nombre"),
    ("advanced-options", "Opciones avanzadas"),
    ("start-time-label", "Inicio (desde el principio si no se indica):"),
    ("end-time-label", "Fin (hasta el final si no se indica):"),
    ("download-button", "Descargar"),
    ("cancel-button", "Cancelar"),
    ("ok-button", "Aceptar"),
    ("status-ready", "Listo"),
    ("status-downloading", "Descargando..."),
    ("status-complete", "Descarga completada"),
    ("status-cancelled", "Descarga cancelada"),
    ("network-error-title", "Error de red"),
    ("network-error-message", "Compruebe su conexión a internet e inténtelo de nuevo."),
    ("url-empty-title", "URL vacía"),
    ("url-empty-message", "Debe proporcionar una URL válida."),
    ("time-format-title", "Tiempo inválido"),
    ("time-format-message", "Los tiempos de inicio y fin deben usar el formato HH:MM:SS."),
    ("time-range-title", "Rango de tiempo inválido"),
    ("time-range-message", "El inicio debe ser anterior al fin."),
    ("invalid-url-title", "URL inválida"),
    ("invalid-url-message", "La URL proporcionada no es válida. Ingrese una URL válida."),
    ("download-error-title", "Error"),
    ("download-error-message", "Ocurrió un error durante la descarga."),
    ("download-complete-title", "Listo"),
    ("download-complete-message", "La descarga terminó correctamente."),
];

pub struct Localizations {
    translations: HashMap<&'static str, Translations>,
    current_lang: &'static str,
}

impl Localizations {
    /// `preferred` wins over `LANG`; anything unknown ends up on English.
    pub fn new(preferred: Option<&str>) -> Self {
        let mut translations = HashMap::new();
        translations.insert("en-US", Translations::from_pairs(EN_US));
        translations.insert("es-ES", Translations::from_pairs(ES_ES));

        let mut localizer = Self {
            translations,
            current_lang: FALLBACK_LANG,
        };

        let requested = preferred
            .map(str::to_string)
            .or_else(|| std::env::var("LANG").ok());
        if let Some(lang) = requested {
            localizer.select(&lang);
        }

        localizer
    }

    pub fn current(&self) -> &'static str {
        self.current_lang
    }

    /// Missing keys fall back to English, then to the key itself.
    pub fn text(&self, key: &str) -> String {
        self.translations
            .get(self.current_lang)
            .and_then(|t| t.lookup(key))
            .or_else(|| self.translations.get(FALLBACK_LANG).and_then(|t| t.lookup(key)))
            .unwrap_or(key)
            .to_string()
    }

    /// Accepts `es-ES`, `es_ES.UTF-8`, `es`, ...
    pub fn select(&mut self, lang: &str) {
        let lang_part = lang
            .split(['-', '_', '.'])
            .next()
            .unwrap_or(lang)
            .to_lowercase();

        self.current_lang = self
            .translations
            .keys()
            .copied()
            .find(|key| *key == lang || key.starts_with(&format!("{lang_part}-")))
            .unwrap_or(FALLBACK_LANG);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserMessage;

    #[test]
    fn selects_by_language_prefix() {
        let mut l = Localizations::new(Some("en-US"));
        l.select("es_ES.UTF-8");
        assert_eq!(l.current(), "es-ES");
        l.select("es");
        assert_eq!(l.current(), "es-ES");
        l.select("fr-FR");
        assert_eq!(l.current(), "en-US");
    }

    #[test]
    fn spanish_falls_back_to_english() {
        let l = Localizations::new(Some("es-ES"));
        assert_eq!(l.text("download-button"), "Descargar");
        assert_eq!(l.text("url-placeholder"), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(l.text("no-such-key"), "no-such-key");
    }

    #[test]
    fn every_message_is_translated() {
        let messages = [
            UserMessage::NetworkError,
            UserMessage::EmptyUrl,
            UserMessage::MalformedTime,
            UserMessage::InvalidTimeRange,
            UserMessage::InvalidUrl,
            UserMessage::DownloadFailed,
            UserMessage::DownloadComplete,
        ];
        for lang in [EN_US, ES_ES] {
            let table = Translations::from_pairs(lang);
            for message in messages {
                let (title, body) = message.keys();
                assert!(table.lookup(title).is_some(), "{title}");
                assert!(table.lookup(body).is_some(), "{body}");
            }
        }
    }
}
