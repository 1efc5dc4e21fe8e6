use chrono::{DateTime, Duration, Utc};
use garde::Validate;
use kernel::model::{
    booking::{interval::TimeInterval, reference},
    id::RoomId,
    room::{event::CreateRoom, Equipment, Room},
};
use serde::{Deserialize, Serialize};
use shared::error::AppResult;

// 区間が指定されない場合、今から 30 分間の空きを調べる
const DEFAULT_SEARCH_MINUTES: i64 = 30;

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentPayload {
    #[serde(default)]
    pub speaker: bool,
    #[serde(default)]
    pub whiteboard: bool,
    #[serde(default)]
    pub monitor: bool,
    #[serde(default)]
    pub hdmi_cable: bool,
}

impl From<EquipmentPayload> for Equipment {
    fn from(value: EquipmentPayload) -> Self {
        let EquipmentPayload {
            speaker,
            whiteboard,
            monitor,
            hdmi_cable,
        } = value;
        Equipment {
            speaker,
            whiteboard,
            monitor,
            hdmi_cable,
        }
    }
}

impl From<Equipment> for EquipmentPayload {
    fn from(value: Equipment) -> Self {
        let Equipment {
            speaker,
            whiteboard,
            monitor,
            hdmi_cable,
        } = value;
        Self {
            speaker,
            whiteboard,
            monitor,
            hdmi_cable,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[garde(length(min = 2, max = 32), custom(bookable_room_name))]
    pub room_name: String,
    #[garde(length(min = 1, max = 64))]
    pub room_type: String,
    #[garde(range(min = 1))]
    pub capacity: i32,
    #[serde(default)]
    #[garde(skip)]
    pub equipment: EquipmentPayload,
    #[garde(skip)]
    pub image: Option<String>,
}

fn normalize_room_name(room_name: &str) -> String {
    room_name.trim().to_uppercase()
}

// 保存される部屋名から常に正しい形式の参照番号が作れること
fn bookable_room_name(room_name: &str, _: &()) -> garde::Result {
    if reference::is_structured_room_name(&normalize_room_name(room_name)) {
        Ok(())
    } else {
        Err(garde::Error::new(
            "room name must look like CB06.06.112 (building code, floor, room number)",
        ))
    }
}

impl From<CreateRoomRequest> for CreateRoom {
    fn from(value: CreateRoomRequest) -> Self {
        let CreateRoomRequest {
            room_name,
            room_type,
            capacity,
            equipment,
            image,
        } = value;
        CreateRoom {
            room_name: normalize_room_name(&room_name),
            room_type,
            capacity,
            equipment: equipment.into(),
            image,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub room_id: RoomId,
    pub room_name: String,
    pub room_type: String,
    pub capacity: i32,
    pub location: String,
    pub equipment: EquipmentPayload,
    pub equipment_labels: Vec<String>,
    pub image: Option<String>,
}

impl From<Room> for RoomResponse {
    fn from(value: Room) -> Self {
        let location = value.location();
        let equipment_labels = value
            .equipment
            .labels()
            .into_iter()
            .map(String::from)
            .collect();
        let Room {
            room_id,
            room_name,
            room_type,
            capacity,
            equipment,
            image,
        } = value;
        Self {
            room_id,
            room_name,
            room_type,
            capacity,
            location,
            equipment: equipment.into(),
            equipment_labels,
            image,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsResponse {
    pub items: Vec<RoomResponse>,
}

impl From<Vec<Room>> for RoomsResponse {
    fn from(value: Vec<Room>) -> Self {
        Self {
            items: value.into_iter().map(RoomResponse::from).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableRoomsQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl AvailableRoomsQuery {
    pub fn into_interval(self, now: DateTime<Utc>) -> AppResult<TimeInterval> {
        let start = self.start.unwrap_or(now);
        match self.end {
            Some(end) => TimeInterval::new(start, end),
            None => TimeInterval::with_duration(start, Duration::minutes(DEFAULT_SEARCH_MINUTES)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub room_id: RoomId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
}
