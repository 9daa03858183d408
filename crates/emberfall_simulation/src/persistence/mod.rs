//! Персистентность: save-слоты, pending-apply через смену сцен, настройки
//!
//! Поток данных:
//! - смерть персонажа регистрирует его запись в pending-таблице;
//! - save сливает снимки живых savable персонажей с pending (pending
//!   побеждает) и атомарно пишет слот;
//! - load заменяет pending содержимым слота и просит смену сцены;
//! - каждый спавнящийся Character потребляет свою pending-запись:
//!   мёртвая запись = despawn, живая = восстановление позиции/здоровья.

pub mod save_data;
pub mod settings;

pub use save_data::{apply_save_data, gather_save_data, CharacterSaveData, SaveEntry, SaveSlotFile};
pub use settings::{default_settings, Settings};

use bevy::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::combat::PlayerHealthChanged;
use crate::components::{Character, CharacterState, Facing, Health, Player};
use crate::logger;
use crate::SimulationSet;

/// Запрос сохранения в слот
#[derive(Event, Debug, Clone)]
pub struct SaveGameRequest {
    pub slot: u32,
}

/// Запрос загрузки из слота
#[derive(Event, Debug, Clone)]
pub struct LoadGameRequest {
    pub slot: u32,
}

/// Симуляция просит фронтенд перезагрузить сцену (после успешного load)
#[derive(Event, Debug, Clone)]
pub struct SceneChangeRequest {
    pub scene_id: String,
}

/// Идентификатор текущей сцены — пишется в save-файл
#[derive(Resource, Debug, Clone)]
pub struct ActiveScene {
    pub scene_id: String,
}

impl Default for ActiveScene {
    fn default() -> Self {
        Self {
            scene_id: "levels/main".to_string(),
        }
    }
}

/// Менеджер сохранений: pending-таблица + файловые слоты + настройки
#[derive(Resource, Debug)]
pub struct SaveManager {
    save_dir: PathBuf,
    pending: HashMap<String, CharacterSaveData>,
}

impl Default for SaveManager {
    fn default() -> Self {
        Self::new("saves")
    }
}

impl SaveManager {
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
            pending: HashMap::new(),
        }
    }

    /// Запись, ждущая применения при следующем спавне персонажа
    pub fn register_pending_data(&mut self, save_id: &str, data: CharacterSaveData) {
        self.pending.insert(save_id.to_string(), data);
    }

    pub fn get_pending_data(&self, save_id: &str) -> Option<&CharacterSaveData> {
        self.pending.get(save_id)
    }

    pub fn clear_pending_data(&mut self, save_id: &str) {
        self.pending.remove(save_id);
    }

    /// Полный сброс pending (new game)
    pub fn clear_all(&mut self) {
        self.pending.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn slot_path(&self, slot: u32) -> PathBuf {
        self.save_dir.join(format!("slot_{slot}.save"))
    }

    fn settings_path(&self) -> PathBuf {
        self.save_dir.join("settings.json")
    }

    pub fn has_save(&self, slot: u32) -> bool {
        self.slot_path(slot).exists()
    }

    pub fn delete_save(&mut self, slot: u32) -> bool {
        match fs::remove_file(self.slot_path(slot)) {
            Ok(()) => true,
            Err(error) => {
                if error.kind() != io::ErrorKind::NotFound {
                    logger::log_error(&format!("failed to delete save slot {slot}: {error}"));
                }
                false
            }
        }
    }

    /// Пишет слот: снимки живых персонажей + pending-записи
    ///
    /// Pending побеждает при коллизии id — запись погибшего нельзя
    /// затереть устаревшим живым снимком. Запись атомарная (temp +
    /// rename), true = успех.
    pub fn save_game(
        &self,
        live: Vec<(String, CharacterSaveData)>,
        scene_id: &str,
        slot: u32,
    ) -> bool {
        let mut merged = self.pending.clone();
        for (id, data) in live {
            merged.entry(id).or_insert(data);
        }

        let file = SaveSlotFile {
            timestamp: chrono::Utc::now().timestamp(),
            scene_id: scene_id.to_string(),
            entities: merged
                .into_iter()
                .filter_map(|(id, data)| serde_json::to_value(SaveEntry { id, data }).ok())
                .collect(),
        };

        let path = self.slot_path(slot);
        let bytes = match serde_json::to_vec_pretty(&file) {
            Ok(bytes) => bytes,
            Err(error) => {
                logger::log_error(&format!("failed to serialize save slot {slot}: {error}"));
                return false;
            }
        };
        match write_atomic(&path, &bytes) {
            Ok(()) => {
                logger::log_info(&format!(
                    "saved {} entities to slot {slot} (scene {scene_id})",
                    file.entities.len()
                ));
                true
            }
            Err(error) => {
                logger::log_error(&format!("failed to write save slot {slot}: {error}"));
                false
            }
        }
    }

    /// Читает слот и заменяет pending его содержимым
    ///
    /// Возвращает scene id для перезагрузки, None = слот отсутствует или
    /// битый целиком. Битые записи отдельных персонажей пропускаются
    /// (fail closed), остальные применяются.
    pub fn load_game(&mut self, slot: u32) -> Option<String> {
        let path = self.slot_path(slot);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(error) => {
                logger::log_error(&format!("failed to read save slot {slot}: {error}"));
                return None;
            }
        };
        let file: SaveSlotFile = match serde_json::from_slice(&bytes) {
            Ok(file) => file,
            Err(error) => {
                logger::log_error(&format!("save slot {slot} is corrupted: {error}"));
                return None;
            }
        };

        self.pending.clear();
        for value in file.entities {
            match serde_json::from_value::<SaveEntry>(value) {
                Ok(entry) => {
                    self.pending.insert(entry.id, entry.data);
                }
                Err(error) => {
                    logger::log_warning(&format!("skipping malformed save record: {error}"));
                }
            }
        }

        logger::log_info(&format!(
            "loaded slot {slot}: {} pending records, scene {}",
            self.pending.len(),
            file.scene_id
        ));
        Some(file.scene_id)
    }

    pub fn save_settings(&self, settings: &Settings) -> bool {
        let bytes = match serde_json::to_vec_pretty(settings) {
            Ok(bytes) => bytes,
            Err(error) => {
                logger::log_error(&format!("failed to serialize settings: {error}"));
                return false;
            }
        };
        match write_atomic(&self.settings_path(), &bytes) {
            Ok(()) => true,
            Err(error) => {
                logger::log_error(&format!("failed to write settings: {error}"));
                false
            }
        }
    }

    /// Настройки с диска; нет файла или битый — дефолты
    pub fn load_settings(&self) -> Settings {
        let bytes = match fs::read(self.settings_path()) {
            Ok(bytes) => bytes,
            Err(_) => return default_settings(),
        };
        match serde_json::from_slice(&bytes) {
            Ok(settings) => settings,
            Err(error) => {
                logger::log_warning(&format!("settings file is corrupted, using defaults: {error}"));
                default_settings()
            }
        }
    }
}

/// Атомарная замена файла: запись во временный + rename
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    if let Err(error) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(error);
    }
    Ok(())
}

/// Спавнящийся персонаж потребляет свою pending-запись
///
/// Мёртвая запись = despawn (убитые не respawn'ятся после смены сцены),
/// живая = восстановление позиции/здоровья/facing. Запись удаляется из
/// pending в обоих случаях.
pub fn apply_pending_on_spawn(
    mut commands: Commands,
    mut save: ResMut<SaveManager>,
    mut health_changed: EventWriter<PlayerHealthChanged>,
    mut spawned: Query<
        (
            Entity,
            &Character,
            &mut Transform,
            &mut Health,
            &mut Facing,
            Option<&Player>,
        ),
        Added<Character>,
    >,
) {
    for (entity, character, mut transform, mut health, mut facing, player) in spawned.iter_mut() {
        if !character.savable {
            continue;
        }
        let Some(data) = save.get_pending_data(&character.save_id) else {
            continue;
        };
        let data = data.clone();
        save.clear_pending_data(&character.save_id);

        if !apply_save_data(&data, &mut transform, &mut health, &mut facing) {
            commands.entity(entity).despawn();
            logger::log(&format!(
                "{} ({}) is dead in save data, despawning",
                character.name, character.save_id
            ));
            continue;
        }

        if player.is_some() {
            health_changed.write(PlayerHealthChanged {
                current: health.current,
                max: health.max,
            });
        }
    }
}

/// Обрабатывает SaveGameRequest: снимки всех живых savable персонажей
pub fn process_save_requests(
    mut requests: EventReader<SaveGameRequest>,
    save: Res<SaveManager>,
    scene: Res<ActiveScene>,
    live: Query<(&Character, &Transform, &Health, &CharacterState, &Facing)>,
) {
    for request in requests.read() {
        let gathered: Vec<(String, CharacterSaveData)> = live
            .iter()
            .filter(|(character, ..)| character.savable)
            .map(|(character, transform, health, state, facing)| {
                (
                    character.save_id.clone(),
                    gather_save_data(transform, health, state, facing),
                )
            })
            .collect();
        save.save_game(gathered, &scene.scene_id, request.slot);
    }
}

/// Обрабатывает LoadGameRequest: pending из слота + запрос смены сцены
pub fn process_load_requests(
    mut requests: EventReader<LoadGameRequest>,
    mut save: ResMut<SaveManager>,
    mut scene_changes: EventWriter<SceneChangeRequest>,
) {
    for request in requests.read() {
        if let Some(scene_id) = save.load_game(request.slot) {
            scene_changes.write(SceneChangeRequest { scene_id });
        }
    }
}

pub struct PersistencePlugin;

impl Plugin for PersistencePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SaveGameRequest>()
            .add_event::<LoadGameRequest>()
            .add_event::<SceneChangeRequest>()
            .init_resource::<SaveManager>()
            .init_resource::<ActiveScene>()
            .add_systems(
                FixedUpdate,
                apply_pending_on_spawn.in_set(SimulationSet::Spawn),
            )
            .add_systems(
                FixedUpdate,
                (process_save_requests, process_load_requests)
                    .chain()
                    .in_set(SimulationSet::Persistence),
            );
    }
}
