//! Piece kinds and their promotion relationships.

use std::fmt;

/// Kind of a shogi piece, independent of which side owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceKind {
    Pawn,
    Lance,
    Knight,
    Silver,
    Gold,
    Bishop,
    Rook,
    King,
    PromotedPawn,
    PromotedLance,
    PromotedKnight,
    PromotedSilver,
    Horse,
    Dragon,
}

impl PieceKind {
    /// Kinds that can sit in a player's hand, in hand-array order.
    pub const HAND_KINDS: [PieceKind; 7] = [
        PieceKind::Pawn,
        PieceKind::Lance,
        PieceKind::Knight,
        PieceKind::Silver,
        PieceKind::Gold,
        PieceKind::Bishop,
        PieceKind::Rook,
    ];

    pub const fn is_promoted(self) -> bool {
        matches!(
            self,
            Self::PromotedPawn
                | Self::PromotedLance
                | Self::PromotedKnight
                | Self::PromotedSilver
                | Self::Horse
                | Self::Dragon
        )
    }

    /// Whether this kind has a promoted form. Gold and king never promote.
    pub const fn can_promote(self) -> bool {
        !self.is_promoted() && !matches!(self, Self::Gold | Self::King)
    }

    /// Promoted form, or `self` when the kind cannot promote.
    pub const fn promoted(self) -> Self {
        match self {
            Self::Pawn => Self::PromotedPawn,
            Self::Lance => Self::PromotedLance,
            Self::Knight => Self::PromotedKnight,
            Self::Silver => Self::PromotedSilver,
            Self::Bishop => Self::Horse,
            Self::Rook => Self::Dragon,
            other => other,
        }
    }

    /// Base form; a captured piece returns to hand in this form.
    pub const fn unpromoted(self) -> Self {
        match self {
            Self::PromotedPawn => Self::Pawn,
            Self::PromotedLance => Self::Lance,
            Self::PromotedKnight => Self::Knight,
            Self::PromotedSilver => Self::Silver,
            Self::Horse => Self::Bishop,
            Self::Dragon => Self::Rook,
            other => other,
        }
    }

    /// Slot in the hand array, `None` for the king.
    pub fn hand_index(self) -> Option<usize> {
        let base = self.unpromoted();
        Self::HAND_KINDS.iter().position(|kind| *kind == base)
    }

    /// Single-character kanji used in KIF move notation.
    pub const fn kif_name(self) -> &'static str {
        match self {
            Self::Pawn => "歩",
            Self::Lance => "香",
            Self::Knight => "桂",
            Self::Silver => "銀",
            Self::Gold => "金",
            Self::Bishop => "角",
            Self::Rook => "飛",
            Self::King => "玉",
            Self::PromotedPawn => "と",
            Self::PromotedLance => "成香",
            Self::PromotedKnight => "成桂",
            Self::PromotedSilver => "成銀",
            Self::Horse => "馬",
            Self::Dragon => "龍",
        }
    }

    /// Parses the longest piece name at the start of `text`.
    ///
    /// Returns the kind and the number of bytes consumed. Accepts the common
    /// alternate spellings (`王`, `竜`, `杏`, `圭`, `全`).
    pub fn parse_kif_prefix(text: &str) -> Option<(Self, usize)> {
        const NAMES: &[(&str, PieceKind)] = &[
            ("成香", PieceKind::PromotedLance),
            ("成桂", PieceKind::PromotedKnight),
            ("成銀", PieceKind::PromotedSilver),
            ("歩", PieceKind::Pawn),
            ("香", PieceKind::Lance),
            ("桂", PieceKind::Knight),
            ("銀", PieceKind::Silver),
            ("金", PieceKind::Gold),
            ("角", PieceKind::Bishop),
            ("飛", PieceKind::Rook),
            ("玉", PieceKind::King),
            ("王", PieceKind::King),
            ("と", PieceKind::PromotedPawn),
            ("杏", PieceKind::PromotedLance),
            ("圭", PieceKind::PromotedKnight),
            ("全", PieceKind::PromotedSilver),
            ("馬", PieceKind::Horse),
            ("龍", PieceKind::Dragon),
            ("竜", PieceKind::Dragon),
        ];
        NAMES
            .iter()
            .find(|(name, _)| text.starts_with(name))
            .map(|(name, kind)| (*kind, name.len()))
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kif_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn promotion_round_trips_for_promotable_kinds() {
        for kind in PieceKind::iter().filter(|k| k.can_promote()) {
            assert!(kind.promoted().is_promoted());
            assert_eq!(kind.promoted().unpromoted(), kind);
        }
    }

    #[test]
    fn gold_and_king_do_not_promote() {
        assert!(!PieceKind::Gold.can_promote());
        assert!(!PieceKind::King.can_promote());
        assert!(!PieceKind::Horse.can_promote());
        assert_eq!(PieceKind::Gold.promoted(), PieceKind::Gold);
    }

    #[test]
    fn parse_prefers_two_character_names() {
        assert_eq!(
            PieceKind::parse_kif_prefix("成香(19)"),
            Some((PieceKind::PromotedLance, "成香".len()))
        );
        assert_eq!(
            PieceKind::parse_kif_prefix("竜(28)"),
            Some((PieceKind::Dragon, "竜".len()))
        );
        assert_eq!(PieceKind::parse_kif_prefix("x"), None);
    }
}
