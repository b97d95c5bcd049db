//! KIF move-annotation text.
//!
//! Reads the header fields the archive needs (start date, players, handicap)
//! and the main line of moves. Variations (`変化`) and everything after a
//! terminal word such as `投了` are ignored.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use game_core::{GameLog, PieceKind, Ply, Square};

use super::{LineEnding, ParseError};

const TERMINAL_WORDS: &[&str] = &[
    "投了",
    "中断",
    "詰み",
    "千日手",
    "持将棋",
    "切れ負け",
    "反則勝ち",
    "反則負け",
    "入玉勝ち",
    "不戦勝",
    "不戦敗",
];

const FULL_WIDTH_FILES: [char; 9] = ['１', '２', '３', '４', '５', '６', '７', '８', '９'];
const KANJI_RANKS: [char; 9] = ['一', '二', '三', '四', '五', '六', '七', '八', '九'];

const DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

pub fn parse(text: &str) -> Result<GameLog, ParseError> {
    let mut start_time_ms = 0;
    let mut black = None;
    let mut white = None;
    let mut handicap = None;
    let mut plies: Vec<Ply> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_start_matches('\u{feff}').trim();

        if line.is_empty() || line.starts_with(['#', '*', '&']) || line.starts_with("手数") {
            continue;
        }
        if line.starts_with("変化") {
            break;
        }

        if line.starts_with(|c: char| c.is_ascii_digit()) {
            match parse_move_line(line, line_no, plies.len() + 1, plies.last())? {
                Some(ply) => plies.push(ply),
                None => break,
            }
            continue;
        }

        let Some((key, value)) = line.split_once('：').or_else(|| line.split_once(':')) else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "開始日時" => {
                start_time_ms = parse_date(value).ok_or_else(|| ParseError::BadDate {
                    line: line_no,
                    value: value.to_string(),
                })?;
            }
            "先手" | "下手" => black = Some(value.to_string()),
            "後手" | "上手" => white = Some(value.to_string()),
            "手合割" => handicap = (value != "平手").then(|| value.to_string()),
            _ => {}
        }
    }

    if black.is_none() && white.is_none() && plies.is_empty() {
        return Err(ParseError::Empty);
    }

    Ok(GameLog::new(
        start_time_ms,
        black.unwrap_or_default(),
        white.unwrap_or_default(),
        plies,
    )
    .with_handicap(handicap))
}

/// Parses `N <move>`; `None` when the line ends the game.
fn parse_move_line(
    line: &str,
    line_no: usize,
    expected: usize,
    previous: Option<&Ply>,
) -> Result<Option<Ply>, ParseError> {
    let digits_end = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    let number: usize = line[..digits_end]
        .parse()
        .map_err(|_| ParseError::syntax(line_no, "bad move number"))?;
    let rest = line[digits_end..].trim_start();

    if TERMINAL_WORDS.iter().any(|word| rest.starts_with(word)) {
        return Ok(None);
    }
    if number != expected {
        return Err(ParseError::syntax(
            line_no,
            format!("expected move {expected}, found {number}"),
        ));
    }

    let (to, rest) = match rest.strip_prefix('同') {
        Some(rest) => {
            let previous =
                previous.ok_or_else(|| ParseError::syntax(line_no, "同 without a previous move"))?;
            (previous.to, rest.trim_start_matches([' ', '\u{3000}']))
        }
        None => {
            let mut chars = rest.chars();
            let file = chars.next().and_then(file_number);
            let rank = chars.next().and_then(rank_number);
            let (Some(file), Some(rank)) = (file, rank) else {
                return Err(ParseError::syntax(line_no, "bad destination square"));
            };
            let square = Square::from_file_rank(file, rank)
                .map_err(|e| ParseError::syntax(line_no, e.to_string()))?;
            (square, chars.as_str())
        }
    };

    let (kind, used) = PieceKind::parse_kif_prefix(rest)
        .ok_or_else(|| ParseError::syntax(line_no, "unknown piece"))?;
    let mut rest = &rest[used..];

    let mut promotes = false;
    if let Some(r) = rest.strip_prefix("不成") {
        rest = r;
    } else if let Some(r) = rest.strip_prefix('成') {
        if !kind.can_promote() {
            return Err(ParseError::syntax(line_no, format!("{kind} cannot promote")));
        }
        promotes = true;
        rest = r;
    }
    let dropped = match rest.strip_prefix('打') {
        Some(r) => {
            rest = r;
            true
        }
        None => false,
    };

    let from = if dropped {
        None
    } else {
        parse_origin(rest, line_no)?
    };

    Ok(Some(Ply {
        piece: if promotes { kind.promoted() } else { kind },
        promotes,
        from,
        to,
    }))
}

fn parse_origin(rest: &str, line_no: usize) -> Result<Option<Square>, ParseError> {
    let Some(inner) = rest.strip_prefix('(') else {
        // Some writers leave out 打 for unambiguous drops.
        return Ok(None);
    };
    let mut chars = inner.chars();
    let file = chars.next().and_then(|c| c.to_digit(10));
    let rank = chars.next().and_then(|c| c.to_digit(10));
    match (file, rank, chars.next()) {
        (Some(file), Some(rank), Some(')')) => Square::from_file_rank(file as u8, rank as u8)
            .map(Some)
            .map_err(|e| ParseError::syntax(line_no, e.to_string())),
        _ => Err(ParseError::syntax(line_no, "bad origin square")),
    }
}

fn file_number(c: char) -> Option<u8> {
    FULL_WIDTH_FILES
        .iter()
        .position(|&f| f == c)
        .map(|i| i as u8 + 1)
        .or_else(|| c.to_digit(10).filter(|d| *d > 0).map(|d| d as u8))
}

fn rank_number(c: char) -> Option<u8> {
    KANJI_RANKS
        .iter()
        .position(|&r| r == c)
        .map(|i| i as u8 + 1)
        .or_else(|| c.to_digit(10).filter(|d| *d > 0).map(|d| d as u8))
}

/// Start date in milliseconds since the epoch, read as UTC.
fn parse_date(value: &str) -> Option<i64> {
    // Drop a weekday annotation such as "(土)".
    let mut cleaned = String::with_capacity(value.len());
    let mut depth = 0usize;
    for c in value.chars() {
        match c {
            '(' | '（' => depth += 1,
            ')' | '）' => depth = depth.saturating_sub(1),
            _ if depth == 0 => cleaned.push(c),
            _ => {}
        }
    }
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    for format in [DATE_FORMAT, "%Y/%m/%d %H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(&cleaned, format) {
            return Some(datetime.and_utc().timestamp_millis());
        }
    }
    ["%Y/%m/%d", "%Y-%m-%d"]
        .into_iter()
        .find_map(|format| NaiveDate::parse_from_str(&cleaned, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp_millis())
}

/// Render `log` as KIF text. Start times keep whole-second precision.
pub fn write(log: &GameLog, line_ending: LineEnding) -> String {
    let mut lines = Vec::with_capacity(log.num_plies() + 5);

    let date = DateTime::from_timestamp_millis(log.start_time_ms())
        .map(|datetime| datetime.format(DATE_FORMAT).to_string())
        .unwrap_or_default();
    lines.push(format!("開始日時：{date}"));
    if let Some(handicap) = log.handicap() {
        lines.push(format!("手合割：{handicap}"));
    }
    lines.push(format!("先手：{}", log.black_player()));
    lines.push(format!("後手：{}", log.white_player()));
    lines.push("手数----指手---------消費時間--".to_string());

    let mut previous: Option<Square> = None;
    for (index, ply) in log.plies().iter().enumerate() {
        lines.push(format!("{:>4} {}", index + 1, format_ply(ply, previous)));
        previous = Some(ply.to);
    }

    let eol = line_ending.as_str();
    let mut text = lines.join(eol);
    text.push_str(eol);
    text
}

fn format_ply(ply: &Ply, previous: Option<Square>) -> String {
    let mut out = String::new();
    if previous == Some(ply.to) {
        out.push_str("同\u{3000}");
    } else {
        out.push(FULL_WIDTH_FILES[usize::from(ply.to.x)]);
        out.push(KANJI_RANKS[usize::from(ply.to.y)]);
    }

    let kind = if ply.promotes {
        ply.piece.unpromoted()
    } else {
        ply.piece
    };
    out.push_str(kind.kif_name());
    if ply.promotes {
        out.push('成');
    }
    match ply.from {
        Some(from) => {
            let _ = write!(out, "({}{})", from.file(), from.rank());
        }
        None => out.push('打'),
    }
    out
}
