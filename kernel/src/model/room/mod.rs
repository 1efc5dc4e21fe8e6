use crate::model::id::RoomId;

pub mod event;

#[derive(Debug, Clone)]
pub struct Room {
    pub room_id: RoomId,
    pub room_name: String,
    pub room_type: String,
    pub capacity: i32,
    pub equipment: Equipment,
    pub image: Option<String>,
}

impl Room {
    // 部屋名の先頭 2 文字が建物コード（例: CB06.06.112 -> CB Building）
    pub fn location(&self) -> String {
        let mut chars = self.room_name.chars();
        match (chars.next(), chars.next()) {
            (Some(a), Some(b)) => format!("{a}{b} Building"),
            _ => "Unknown Location".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Equipment {
    pub speaker: bool,
    pub whiteboard: bool,
    pub monitor: bool,
    pub hdmi_cable: bool,
}

impl Equipment {
    pub fn labels(&self) -> Vec<&'static str> {
        let labels: Vec<&'static str> = [
            (self.speaker, "Speaker"),
            (self.whiteboard, "Whiteboard"),
            (self.monitor, "Monitor"),
            (self.hdmi_cable, "HDMI Cable"),
        ]
        .into_iter()
        .filter_map(|(present, label)| present.then_some(label))
        .collect();

        if labels.is_empty() {
            vec!["Basic Equipment"]
        } else {
            labels
        }
    }
}
