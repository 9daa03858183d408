//! Сериализуемые записи персонажей для save-файлов

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{CharacterState, Facing, Health};

fn default_facing() -> f32 {
    1.0
}

/// Снимок персонажа в save-файле
///
/// `facing` опционален при чтении (старые сейвы его не писали).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CharacterSaveData {
    pub position_x: f32,
    pub position_y: f32,
    pub health: u32,
    pub is_dead: bool,
    #[serde(default = "default_facing")]
    pub facing: f32,
}

/// Запись одного персонажа в слоте: save id + снимок
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SaveEntry {
    pub id: String,
    #[serde(flatten)]
    pub data: CharacterSaveData,
}

/// Содержимое save-слота
///
/// Записи персонажей хранятся как сырые JSON-значения и парсятся
/// по одной: битая запись пропускается, не валит весь файл.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SaveSlotFile {
    pub timestamp: i64,
    pub scene_id: String,
    pub entities: Vec<serde_json::Value>,
}

/// Снимок живого персонажа
pub fn gather_save_data(
    transform: &Transform,
    health: &Health,
    state: &CharacterState,
    facing: &Facing,
) -> CharacterSaveData {
    CharacterSaveData {
        position_x: transform.translation.x,
        position_y: transform.translation.y,
        health: health.current,
        is_dead: state.is_dead(),
        facing: facing.direction,
    }
}

/// Применяет запись к только что заспавненному персонажу
///
/// false = запись помечена is_dead, персонаж должен быть удалён,
/// состояние не тронуто. Health клампится к max.
pub fn apply_save_data(
    data: &CharacterSaveData,
    transform: &mut Transform,
    health: &mut Health,
    facing: &mut Facing,
) -> bool {
    if data.is_dead {
        return false;
    }
    transform.translation.x = data.position_x;
    transform.translation.y = data.position_y;
    health.current = data.health.min(health.max);
    facing.direction = data.facing;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_and_apply_roundtrip() {
        let transform = Transform::from_translation(Vec3::new(42.0, -7.5, 0.0));
        let mut health = Health::new(100);
        health.current = 55;
        let facing = Facing { direction: -1.0 };

        let data = gather_save_data(&transform, &health, &CharacterState::Idle, &facing);
        assert!(!data.is_dead);

        let mut restored_transform = Transform::default();
        let mut restored_health = Health::new(100);
        let mut restored_facing = Facing::default();
        assert!(apply_save_data(
            &data,
            &mut restored_transform,
            &mut restored_health,
            &mut restored_facing
        ));
        assert_eq!(restored_transform.translation.x, 42.0);
        assert_eq!(restored_transform.translation.y, -7.5);
        assert_eq!(restored_health.current, 55);
        assert_eq!(restored_facing.direction, -1.0);
    }

    #[test]
    fn test_apply_dead_record_refuses() {
        let data = CharacterSaveData {
            position_x: 0.0,
            position_y: 0.0,
            health: 0,
            is_dead: true,
            facing: 1.0,
        };
        let mut transform = Transform::from_translation(Vec3::new(9.0, 9.0, 0.0));
        let mut health = Health::new(50);
        let mut facing = Facing::default();

        assert!(!apply_save_data(&data, &mut transform, &mut health, &mut facing));
        // Состояние не тронуто
        assert_eq!(transform.translation.x, 9.0);
        assert_eq!(health.current, 50);
    }

    #[test]
    fn test_apply_clamps_health_to_max() {
        let data = CharacterSaveData {
            position_x: 0.0,
            position_y: 0.0,
            health: 9999,
            is_dead: false,
            facing: 1.0,
        };
        let mut transform = Transform::default();
        let mut health = Health::new(80);
        let mut facing = Facing::default();

        assert!(apply_save_data(&data, &mut transform, &mut health, &mut facing));
        assert_eq!(health.current, 80);
    }

    #[test]
    fn test_facing_defaults_on_old_records() {
        let json = r#"{"id":"a","position_x":1.0,"position_y":2.0,"health":10,"is_dead":false}"#;
        let entry: SaveEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.data.facing, 1.0);
    }
}
