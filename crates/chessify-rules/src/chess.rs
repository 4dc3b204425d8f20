//! Standard chess via `shakmaty`.

use chessify_protocol::{MoveRequest, Side};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, Color, EnPassantMode, Position as _, Role, Square};

use crate::{RulesEngine, RulesError};

/// Standard chess from the usual starting position.
///
/// Moves arrive as a source square, a target square and an optional
/// promotion letter, each parsed on its own and combined into a UCI move,
/// so castling is the king's two-square move. Positions print as FEN.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl RulesEngine for StandardChess {
    type Position = Chess;

    fn initial_position() -> Chess {
        Chess::default()
    }

    fn active_side(position: &Chess) -> Side {
        match position.turn() {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }

    fn apply(position: &Chess, request: &MoveRequest) -> Result<Chess, RulesError> {
        let uci = UciMove::Normal {
            from: parse_square(&request.from)?,
            to: parse_square(&request.to)?,
            promotion: request.promotion.as_deref().map(parse_piece).transpose()?,
        };

        let mv = uci
            .to_move(position)
            .map_err(|_| RulesError::Illegal(format!("{uci} is not legal here")))?;
        if !position.is_legal(&mv) {
            return Err(RulesError::Illegal(format!("{uci} is not legal here")));
        }

        let mut next = position.clone();
        next.play_unchecked(&mv);
        Ok(next)
    }

    fn serialize(position: &Chess) -> String {
        Fen::from_position(position.clone(), EnPassantMode::Legal).to_string()
    }
}

/// Reads one square name such as `e4` or `E4`.
fn parse_square(text: &str) -> Result<Square, RulesError> {
    Square::from_ascii(text.to_ascii_lowercase().as_bytes())
        .map_err(|_| RulesError::Illegal(format!("{text:?} is not a square")))
}

/// Reads a single promotion piece letter.
fn parse_piece(text: &str) -> Result<Role, RulesError> {
    let mut chars = text.chars();
    let piece = match (chars.next(), chars.next()) {
        (Some(letter), None) => Role::from_char(letter.to_ascii_lowercase()),
        _ => None,
    };
    piece.ok_or_else(|| RulesError::Illegal(format!("{text:?} is not a piece letter")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn play(moves: &[(&str, &str)]) -> Chess {
        moves
            .iter()
            .fold(StandardChess::initial_position(), |pos, (from, to)| {
                StandardChess::apply(&pos, &MoveRequest::new(*from, *to))
                    .expect("scripted move should be legal")
            })
    }

    #[test]
    fn test_initial_position_serializes_to_start_fen() {
        let pos = StandardChess::initial_position();
        assert_eq!(StandardChess::serialize(&pos), START);
        assert_eq!(StandardChess::active_side(&pos), Side::White);
    }

    #[test]
    fn test_legal_opening_move_advances_position() {
        let pos = StandardChess::initial_position();
        let next = StandardChess::apply(&pos, &MoveRequest::new("e2", "e4")).unwrap();

        // No en-passant square: no black pawn can capture on e3.
        assert_eq!(
            StandardChess::serialize(&next),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        assert_eq!(StandardChess::active_side(&next), Side::Black);
        // The input position is untouched.
        assert_eq!(StandardChess::serialize(&pos), START);
    }

    #[test]
    fn test_illegal_move_is_rejected() {
        let pos = StandardChess::initial_position();
        let result = StandardChess::apply(&pos, &MoveRequest::new("e2", "e5"));
        assert!(matches!(result, Err(RulesError::Illegal(_))));
    }

    #[test]
    fn test_moving_opponents_piece_is_rejected() {
        let pos = StandardChess::initial_position();
        let result = StandardChess::apply(&pos, &MoveRequest::new("e7", "e5"));
        assert!(matches!(result, Err(RulesError::Illegal(_))));
    }

    #[test]
    fn test_malformed_squares_are_rejected() {
        let pos = StandardChess::initial_position();
        for (from, to) in [("z9", "e4"), ("", ""), ("e2", "e4e5")] {
            let result = StandardChess::apply(&pos, &MoveRequest::new(from, to));
            assert!(
                matches!(result, Err(RulesError::Illegal(_))),
                "{from}{to} should be illegal"
            );
        }
    }

    #[test]
    fn test_squares_are_parsed_separately_not_concatenated() {
        let pos = StandardChess::initial_position();
        let requests = [
            MoveRequest::new("", "e2e4"),
            MoveRequest::new("e2e", "4"),
            MoveRequest::new("e2e4", ""),
            MoveRequest::new("e2", "e").promoting("4"),
        ];
        for request in requests {
            let result = StandardChess::apply(&pos, &request);
            assert!(
                matches!(result, Err(RulesError::Illegal(_))),
                "{request:?} should be illegal"
            );
        }
    }

    #[test]
    fn test_promotion_must_be_one_piece_letter() {
        let pos: Chess = "7k/P7/8/8/8/8/8/K7 w - - 0 1"
            .parse::<Fen>()
            .unwrap()
            .into_position(shakmaty::CastlingMode::Standard)
            .unwrap();

        for letter in ["qq", "", "x", "4"] {
            let result =
                StandardChess::apply(&pos, &MoveRequest::new("a7", "a8").promoting(letter));
            assert!(
                matches!(result, Err(RulesError::Illegal(_))),
                "promotion {letter:?} should be illegal"
            );
        }
        assert!(
            StandardChess::apply(&pos, &MoveRequest::new("a7", "a8").promoting("Q")).is_ok()
        );
    }

    #[test]
    fn test_uppercase_squares_are_accepted() {
        let pos = StandardChess::initial_position();
        assert!(StandardChess::apply(&pos, &MoveRequest::new("G1", "F3")).is_ok());
    }

    #[test]
    fn test_castling_by_king_two_squares() {
        let pos = play(&[
            ("e2", "e4"),
            ("e7", "e5"),
            ("g1", "f3"),
            ("b8", "c6"),
            ("f1", "c4"),
            ("g8", "f6"),
        ]);
        let castled = StandardChess::apply(&pos, &MoveRequest::new("e1", "g1")).unwrap();
        assert!(StandardChess::serialize(&castled).starts_with(
            "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQ1RK1 b kq"
        ));
    }

    #[test]
    fn test_promotion_requires_and_uses_piece_letter() {
        let pos: Chess = "7k/P7/8/8/8/8/8/K7 w - - 0 1"
            .parse::<Fen>()
            .unwrap()
            .into_position(shakmaty::CastlingMode::Standard)
            .unwrap();

        let promoted =
            StandardChess::apply(&pos, &MoveRequest::new("a7", "a8").promoting("n")).unwrap();
        assert!(StandardChess::serialize(&promoted).starts_with("N6k/"));

        let bare = StandardChess::apply(&pos, &MoveRequest::new("a7", "a8"));
        assert!(matches!(bare, Err(RulesError::Illegal(_))));
    }
}
