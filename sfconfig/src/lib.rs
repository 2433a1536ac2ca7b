//! # sfconfig - Configuration de Soundfree
//!
//! Ordre de priorité, du plus faible au plus fort :
//! 1. `soundfree.yaml`, embarqué dans le binaire
//! 2. `config.yaml` du répertoire de configuration
//! 3. les variables `SOUNDFREE_CONFIG__SECTION__KEY`
//! 4. les variables de déploiement `PORT`, `ALLOWED_ORIGIN`, `SOUNDCLOUD_CLIENT_ID`
//!
//! Les crates de plateforme ajoutent leurs propres accesseurs via des traits
//! d'extension (`SoundCloudConfigExt`, `YoutubeConfigExt`, `RelayConfigExt`).
//!
//! ## Utilisation
//!
//! ```no_run
//! use sfconfig::get_config;
//!
//! let config = get_config();
//! let port = config.get_http_port();
//! let origins = config.get_allowed_origins();
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Number};
use std::{
    env, fs,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::info;

pub use serde_yaml::Value;

// soundfree.yaml est la seule source des valeurs par défaut des sections
const DEFAULT_CONFIG: &str = include_str!("soundfree.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load Soundfree configuration"));
}

const ENV_CONFIG_DIR: &str = "SOUNDFREE_CONFIG";
const ENV_PREFIX: &str = "SOUNDFREE_CONFIG__";
const CONFIG_DIR_NAME: &str = ".soundfree";

// Variables usuelles d'un hébergeur (Heroku, Render...)
const ENV_PORT: &str = "PORT";
const ENV_ALLOWED_ORIGIN: &str = "ALLOWED_ORIGIN";
const ENV_SOUNDCLOUD_CLIENT_ID: &str = "SOUNDCLOUD_CLIENT_ID";

const DEFAULT_HTTP_PORT: u16 = 3000;
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;

/// Couple getter/setter pour un booléen de la configuration
macro_rules! impl_bool_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> bool {
            match self.get_value($path) {
                Ok(Value::Bool(b)) => b,
                _ => $default,
            }
        }

        pub fn $setter(&self, value: bool) -> Result<()> {
            self.set_value($path, Value::Bool(value))
        }
    };
}

/// Arbre YAML de la configuration, sauvegardé dans `config.yaml` à chaque écriture
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

impl Config {
    /// Argument explicite, puis `SOUNDFREE_CONFIG`, puis `./.soundfree`, puis `~/.soundfree`
    fn find_config_dir(directory: &str) -> String {
        if !directory.is_empty() {
            return directory.to_string();
        }

        if let Ok(from_env) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, dir = %from_env, "Config directory taken from environment");
            return from_env;
        }

        let local = Path::new(CONFIG_DIR_NAME);
        if local.exists() {
            return CONFIG_DIR_NAME.to_string();
        }

        home_dir()
            .map(|home| home.join(CONFIG_DIR_NAME))
            .filter(|candidate| candidate.exists())
            .map(|candidate| candidate.to_string_lossy().into_owned())
            .unwrap_or_else(|| CONFIG_DIR_NAME.to_string())
    }

    /// Crée le répertoire au besoin et vérifie qu'il est lisible
    fn ensure_config_dir(dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        if !dir.is_dir() {
            return Err(anyhow!("{} is not a directory", dir.display()));
        }
        fs::read_dir(dir)?;
        Ok(())
    }

    /// Charge la configuration depuis `directory` (vide : recherche automatique)
    ///
    /// `config.yaml` est créé avec les valeurs par défaut s'il n'existe pas.
    pub fn load_config(directory: &str) -> Result<Self> {
        Self::load_config_with_env(directory, env::vars())
    }

    /// Comme [`Config::load_config`], avec un environnement explicite
    pub fn load_config_with_env<I>(directory: &str, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config_dir = Self::find_config_dir(directory);
        Self::ensure_config_dir(Path::new(&config_dir))?;

        let path = Path::new(&config_dir)
            .join("config.yaml")
            .to_string_lossy()
            .into_owned();

        let mut tree: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;
        let on_disk = fs::read(&path).ok();
        match &on_disk {
            Some(raw) => {
                let user: Value = serde_yaml::from_slice(raw)?;
                merge_yaml(&mut tree, &user);
                info!(file = %path, "📄 Configuration file merged over defaults");
            }
            None => info!(file = %path, "No configuration file, writing defaults"),
        }

        let mut tree = Self::lower_keys_value(tree);
        Self::apply_env_overrides(&mut tree, vars);

        let config = Config {
            config_dir,
            path,
            data: Mutex::new(tree),
        };
        if on_disk.is_none() {
            config.save()?;
        }
        Ok(config)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Value>> {
        self.data
            .lock()
            .map_err(|_| anyhow!("Configuration lock poisoned"))
    }

    /// Répertoire contenant `config.yaml`
    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Écrit l'arbre courant dans `config.yaml`
    pub fn save(&self) -> Result<()> {
        let yaml = {
            let data = self.lock()?;
            serde_yaml::to_string(&*data)?
        };
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    /// Remplace la valeur au chemin `path` (ex. `&["soundcloud", "client_id"]`) puis sauvegarde
    ///
    /// Les sections intermédiaires manquantes sont créées.
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        {
            let mut data = self.lock()?;
            Self::set_value_internal(&mut data, path, value)?;
        }
        self.save()
    }

    fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key_value = Value::String(path[0].to_lowercase());
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    /// Valeur au chemin `path`, erreur si une clé manque
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.lock()?;
        Self::get_value_internal(&data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                match map.get(Value::String(key.to_lowercase())) {
                    Some(next) => current = next,
                    None => return Err(anyhow!("Path {} does not exist", path[..=i].join("."))),
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    fn apply_env_overrides<I>(config: &mut Value, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                let key_path = stripped.split("__").collect::<Vec<_>>();
                let _ = Self::set_value_internal(config, &key_path, Self::convert_env_value(&value));
                continue;
            }

            let _ = match key.as_str() {
                ENV_PORT => Self::set_value_internal(
                    config,
                    &["host", "http_port"],
                    Self::convert_env_value(&value),
                ),
                ENV_ALLOWED_ORIGIN => {
                    let origins = value
                        .split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(|o| Value::String(o.to_string()))
                        .collect();
                    Self::set_value_internal(
                        config,
                        &["host", "allowed_origins"],
                        Value::Sequence(origins),
                    )
                }
                ENV_SOUNDCLOUD_CLIENT_ID => Self::set_value_internal(
                    config,
                    &["soundcloud", "client_id"],
                    Value::String(value.trim().to_string()),
                ),
                _ => Ok(()),
            };
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            return parsed;
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    let new_key = match k {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    new_map.insert(new_key, Self::lower_keys_value(v));
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    /// Chaîne non vide au chemin `path`
    pub fn get_string(&self, path: &[&str]) -> Option<String> {
        match self.get_value(path) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Entier non signé au chemin `path`, `default` si absent ou invalide
    pub fn get_u64(&self, path: &[&str], default: u64) -> u64 {
        match self.get_value(path) {
            Ok(Value::Number(n)) => n.as_u64().unwrap_or(default),
            Ok(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Booléen au chemin `path` (`yes`/`no`, `1`/`0` acceptés), `default` sinon
    pub fn get_bool(&self, path: &[&str], default: bool) -> bool {
        match self.get_value(path) {
            Ok(Value::Bool(b)) => b,
            Ok(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// Port d'écoute (3000 si absent ou invalide)
    pub fn get_http_port(&self) -> u16 {
        match self.get_value(&["host", "http_port"]) {
            Ok(Value::Number(n)) => match n.as_u64().and_then(|p| u16::try_from(p).ok()) {
                Some(port) => port,
                None => {
                    tracing::warn!("Invalid HTTP port {}, using default {}", n, DEFAULT_HTTP_PORT);
                    DEFAULT_HTTP_PORT
                }
            },
            Ok(Value::String(s)) => match s.trim().parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    tracing::warn!("Invalid HTTP port '{}', using default {}", s, DEFAULT_HTTP_PORT);
                    DEFAULT_HTTP_PORT
                }
            },
            _ => DEFAULT_HTTP_PORT,
        }
    }

    pub fn set_http_port(&self, port: u16) -> Result<()> {
        self.set_value(&["host", "http_port"], Value::Number(Number::from(port)))
    }

    /// Origines autorisées par la politique CORS
    ///
    /// Liste YAML ou chaîne séparée par des virgules.
    pub fn get_allowed_origins(&self) -> Vec<String> {
        let origins: Vec<String> = match self.get_value(&["host", "allowed_origins"]) {
            Ok(Value::Sequence(seq)) => seq
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.trim().to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect(),
            Ok(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        if origins.is_empty() {
            vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
        } else {
            origins
        }
    }

    impl_bool_config!(
        get_log_enable_console,
        set_log_enable_console,
        &["host", "logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    /// Récupère le niveau de log minimum depuis la configuration
    pub fn get_log_min_level(&self) -> String {
        self.get_string(&["host", "logger", "min_level"])
            .unwrap_or_else(|| DEFAULT_LOG_MIN_LEVEL.to_string())
    }

    /// Définit le niveau de log minimum dans la configuration
    pub fn set_log_min_level(&self, level: String) -> Result<()> {
        self.set_value(&["host", "logger", "min_level"], Value::String(level))
    }
}

/// Configuration du processus, chargée au premier accès
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Fusion récursive : les mappings sont fusionnés clé par clé, tout le reste
/// est remplacé par la valeur de `external`
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}
