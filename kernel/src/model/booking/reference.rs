//! 予約参照番号（例: `CB112-1021M-A1K`）の生成と検証。
//!
//! `{部屋略称}-{MMDD}{時間帯}-{利用者イニシャル}{数字}{英字}` の形式をとる。
//! 末尾 2 文字だけがランダムで、それ以外は入力から決まる。
//! 一意性はデータベースの UNIQUE 制約で担保し、ここでは保証しない。

use chrono::{Datelike, NaiveDateTime, Timelike};
use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

const FALLBACK_ABBREVIATION_LEN: usize = 6;
const CANONICAL_ROOM_NUMBER_LEN: usize = 3;
// 参照番号の部屋略称部分は 3〜8 文字の英大文字と数字
const MIN_ABBREVIATION_LEN: usize = 3;
const MAX_ABBREVIATION_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeSlot {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeSlot::Morning,
            12..=17 => TimeSlot::Afternoon,
            18..=21 => TimeSlot::Evening,
            _ => TimeSlot::Night,
        }
    }

    pub fn code(self) -> char {
        match self {
            TimeSlot::Morning => 'M',
            TimeSlot::Afternoon => 'A',
            TimeSlot::Evening => 'E',
            TimeSlot::Night => 'N',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'M' => Some(TimeSlot::Morning),
            'A' => Some(TimeSlot::Afternoon),
            'E' => Some(TimeSlot::Evening),
            'N' => Some(TimeSlot::Night),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning",
            TimeSlot::Afternoon => "Afternoon",
            TimeSlot::Evening => "Evening",
            TimeSlot::Night => "Night",
        }
    }
}

fn room_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Z]{2})[0-9]+\.[0-9]+\.([0-9]+)([A-Z]*)$")
            .expect("room name pattern is valid")
    })
}

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Z0-9]{3,8}-\d{4}[MAEN]-[A-Z]\d[A-Z]$").expect("reference pattern is valid")
    })
}

/// `start` は部屋のある場所の壁時計時刻で渡すこと
pub fn generate(room_name: &str, start: &NaiveDateTime, user_display_name: &str) -> String {
    generate_with(&mut rand::thread_rng(), room_name, start, user_display_name)
}

pub fn generate_with<R: Rng + ?Sized>(
    rng: &mut R,
    room_name: &str,
    start: &NaiveDateTime,
    user_display_name: &str,
) -> String {
    let abbreviation = room_abbreviation(rng, room_name);
    let slot = TimeSlot::from_hour(start.hour());
    let initial = user_initial(user_display_name);
    let digit = char::from(rng.gen_range(b'0'..=b'9'));
    let letter = char::from(rng.gen_range(b'A'..=b'Z'));

    format!(
        "{abbreviation}-{:02}{:02}{}-{initial}{digit}{letter}",
        start.month(),
        start.day(),
        slot.code(),
    )
}

/// 表示用の形式チェックのみ。認可や一意性の判定には使わない
pub fn is_valid(reference: &str) -> bool {
    reference_pattern().is_match(reference)
}

/// 例: `CB112-1021M-A1K (10/21 Morning, User A)`。不正な文字列はそのまま返す
pub fn format_for_display(reference: &str) -> String {
    if !is_valid(reference) {
        return reference.to_string();
    }

    let mut parts = reference.split('-');
    let (Some(_), Some(date_slot), Some(user_suffix)) = (parts.next(), parts.next(), parts.next())
    else {
        return reference.to_string();
    };

    // 正規表現を通過しているので ASCII のみ
    let slot = date_slot[4..]
        .chars()
        .next()
        .and_then(TimeSlot::from_code)
        .map(TimeSlot::label)
        .unwrap_or_default();

    format!(
        "{reference} ({}/{} {slot}, User {})",
        &date_slot[0..2],
        &date_slot[2..4],
        &user_suffix[0..1],
    )
}

/// `CB06.06.112` のような建物コード付きの部屋名で、略称が参照番号に収まるもの
pub fn is_structured_room_name(room_name: &str) -> bool {
    structured_abbreviation(room_name).is_some()
}

fn structured_abbreviation(room_name: &str) -> Option<String> {
    let caps = room_name_pattern().captures(room_name)?;
    let mut number = &caps[2];
    while number.len() > CANONICAL_ROOM_NUMBER_LEN && number.starts_with('0') {
        number = &number[1..];
    }
    let abbreviation = format!("{}{number}{}", &caps[1], &caps[3]);
    (abbreviation.len() <= MAX_ABBREVIATION_LEN).then_some(abbreviation)
}

// どんな部屋名でも [A-Z0-9]{3,8} の略称を返す
fn room_abbreviation<R: Rng + ?Sized>(rng: &mut R, room_name: &str) -> String {
    if let Some(abbreviation) = structured_abbreviation(room_name) {
        return abbreviation;
    }

    let mut fallback: String = room_name
        .chars()
        .take(FALLBACK_ABBREVIATION_LEN)
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if fallback.is_empty() {
        return format!("RM{:02}", rng.gen_range(0..100));
    }
    while fallback.len() < MIN_ABBREVIATION_LEN {
        fallback.push(char::from(rng.gen_range(b'0'..=b'9')));
    }
    fallback
}

fn user_initial(display_name: &str) -> char {
    display_name
        .split_whitespace()
        .next()
        .and_then(|first| first.chars().next())
        .and_then(|c| c.to_uppercase().next())
        .filter(char::is_ascii_uppercase)
        .unwrap_or('U')
}
