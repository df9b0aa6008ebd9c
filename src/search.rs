//! Iterative-deepening negamax search with alpha-beta pruning
//!
//! The searcher explores the game tree with:
//! - negamax with alpha-beta (the position is self-perspective after
//!   every flip, so scores negate and the window swaps each ply)
//! - a transposition table probed at every interior node
//! - principal-variation (null-window) search for non-first moves
//! - quiescence search with stand pat and delta pruning at the horizon
//! - iterative deepening with best-first root reordering between
//!   iterations and a cooperative wall-clock budget
//!
//! Time is only checked at move boundaries; an iteration interrupted by
//! the budget is discarded wholesale, so the reported move always comes
//! from a fully finished iteration.

use std::time::{Duration, Instant};

use log::debug;

use crate::apply::apply_move;
use crate::attack;
use crate::board::{PieceKind, Position};
use crate::evaluate::evaluate;
use crate::movegen::{generate_active, generate_moves};
use crate::moves::{Move, MoveList};
use crate::tt::{Bound, TranspositionTable};
use crate::zobrist::fingerprint;

/// Infinity score for search bounds
pub const INFINITY: i32 = 30_000;

/// Mate score base; actual mate scores are offset by ply so that
/// faster mates score higher
pub const MATE_SCORE: i32 = 28_000;

/// Draw score
const DRAW_SCORE: i32 = 0;

/// Quiescence search has its own depth bound, independent of the main
/// search depth
const QUIESCENCE_DEPTH: u8 = 8;

/// Positional margin for delta pruning in quiescence
const DELTA_MARGIN: i32 = 200;

/// Transposition table size in MB
const TT_SIZE_MB: usize = 16;

/// Search budget
#[derive(Clone, Copy, Debug)]
pub struct SearchLimits {
    /// Maximum iterative deepening depth
    pub depth: u8,
    /// Optional wall-clock budget
    pub time: Option<Duration>,
    /// Disable to measure transposition table impact; must not change
    /// the chosen move
    pub use_tt: bool,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            depth: 4,
            time: None,
            use_tt: true,
        }
    }
}

/// Outcome of one search call
#[derive(Clone, Copy, Debug)]
pub struct SearchResult {
    /// Best move, None only if the mover has no legal move
    pub best_move: Option<Move>,
    /// Score of the best move from the mover's perspective
    pub score: i32,
    /// Deepest fully completed iteration
    pub depth: u8,
    /// Nodes visited
    pub nodes: u64,
}

/// Single-threaded searcher owning its transposition table
pub struct Searcher {
    tt: TranspositionTable,
    nodes: u64,
    stop: bool,
    deadline: Option<Instant>,
    use_tt: bool,
}

impl Searcher {
    /// Create a new searcher
    pub fn new() -> Self {
        Searcher {
            tt: TranspositionTable::new(TT_SIZE_MB),
            nodes: 0,
            stop: false,
            deadline: None,
            use_tt: true,
        }
    }

    /// Search `pos` under the given limits and return the best move
    /// found by the deepest completed iteration.
    pub fn search(&mut self, pos: &Position, limits: &SearchLimits) -> SearchResult {
        let start = Instant::now();
        self.nodes = 0;
        self.stop = false;
        self.deadline = limits.time.map(|budget| start + budget);
        self.use_tt = limits.use_tt;
        self.tt.new_search();

        // Only legal root moves participate
        let mut roots: Vec<(Move, i32)> = Vec::new();
        for &mv in &generate_moves(pos) {
            if apply_move(pos, mv).is_some() {
                roots.push((mv, -INFINITY));
            }
        }
        if roots.is_empty() {
            let score = if attack::in_check(pos) {
                -MATE_SCORE
            } else {
                DRAW_SCORE
            };
            return SearchResult {
                best_move: None,
                score,
                depth: 0,
                nodes: self.nodes,
            };
        }

        let mut best_move = roots[0].0;
        let mut best_score = -INFINITY;
        let mut completed_depth = 0;

        for depth in 1..=limits.depth.max(1) {
            let mut alpha = -INFINITY;
            let beta = INFINITY;
            let mut finished = true;

            for i in 0..roots.len() {
                let mv = roots[i].0;
                let mut child = match apply_move(pos, mv) {
                    Some(c) => c,
                    None => continue,
                };
                child.flip();

                let score = if i == 0 {
                    -self.negamax(&child, depth - 1, -beta, -alpha, 1)
                } else {
                    // Null-window probe; re-search only on fail-high
                    let probe = -self.negamax(&child, depth - 1, -alpha - 1, -alpha, 1);
                    if probe > alpha && !self.stop {
                        -self.negamax(&child, depth - 1, -beta, -alpha, 1)
                    } else {
                        probe
                    }
                };

                if self.stop {
                    finished = false;
                    break;
                }

                roots[i].1 = score;
                if score > alpha {
                    alpha = score;
                }
            }

            if !finished {
                break;
            }

            // Best-first for the next, deeper iteration
            roots.sort_by(|a, b| b.1.cmp(&a.1));
            best_move = roots[0].0;
            best_score = roots[0].1;
            completed_depth = depth;

            debug!(
                "depth {} best {} score {} nodes {}",
                depth, best_move, best_score, self.nodes
            );
        }

        SearchResult {
            best_move: Some(best_move),
            score: best_score,
            depth: completed_depth,
            nodes: self.nodes,
        }
    }

    fn negamax(&mut self, pos: &Position, depth: u8, mut alpha: i32, mut beta: i32, ply: u8) -> i32 {
        if self.should_stop() {
            self.stop = true;
            return 0;
        }
        self.nodes += 1;

        // The stall rule forces a draw no matter what is on the board
        if pos.stall_clock >= 50 {
            return DRAW_SCORE;
        }

        let hash = fingerprint(pos);
        let mut tt_move = None;
        if self.use_tt {
            if let Some(entry) = self.tt.probe(hash) {
                tt_move = entry.best_move();
                // Usable only if computed at least this deep
                if entry.depth() >= depth {
                    let value = entry.score() as i32;
                    match entry.bound() {
                        Bound::Exact => return value,
                        Bound::Lower => alpha = alpha.max(value),
                        Bound::Upper => beta = beta.min(value),
                    }
                    if alpha >= beta {
                        return value;
                    }
                }
            }
        }

        if depth == 0 {
            return self.quiescence(pos, alpha, beta, ply, QUIESCENCE_DEPTH);
        }

        let mut moves = generate_moves(pos);
        order_moves(pos, &mut moves, tt_move);

        let alpha_orig = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;
        let mut searched = 0u32;

        for i in 0..moves.len() {
            let mv = moves[i];
            let mut child = match apply_move(pos, mv) {
                Some(c) => c,
                None => continue,
            };
            child.flip();

            let score = if searched == 0 {
                -self.negamax(&child, depth - 1, -beta, -alpha, ply + 1)
            } else {
                let probe = -self.negamax(&child, depth - 1, -alpha - 1, -alpha, ply + 1);
                if probe > alpha && probe < beta && !self.stop {
                    -self.negamax(&child, depth - 1, -beta, -alpha, ply + 1)
                } else {
                    probe
                }
            };
            searched += 1;

            if self.stop {
                return best_score;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
                if score > alpha {
                    alpha = score;
                    if alpha >= beta {
                        break; // Beta cutoff
                    }
                }
            }
        }

        // No pseudo-legal move survived the legality gate
        if searched == 0 {
            return if attack::in_check(pos) {
                -(MATE_SCORE - ply as i32)
            } else {
                DRAW_SCORE
            };
        }

        if self.use_tt {
            let bound = if best_score >= beta {
                Bound::Lower
            } else if best_score <= alpha_orig {
                Bound::Upper
            } else {
                Bound::Exact
            };
            let clamped = best_score.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
            self.tt.store(hash, best_move, clamped, depth, bound);
        }

        best_score
    }

    /// Search only "loud" continuations at the horizon so an exchange is
    /// never cut off halfway through.
    fn quiescence(&mut self, pos: &Position, mut alpha: i32, beta: i32, ply: u8, qdepth: u8) -> i32 {
        if self.should_stop() {
            self.stop = true;
            return 0;
        }
        self.nodes += 1;

        if qdepth == 0 {
            return evaluate(pos);
        }

        if attack::in_check(pos) {
            // No standing pat in check: every reply must be examined
            let mut best = -INFINITY;
            let mut searched = 0u32;
            for &mv in &generate_moves(pos) {
                let mut child = match apply_move(pos, mv) {
                    Some(c) => c,
                    None => continue,
                };
                child.flip();
                searched += 1;

                let score = -self.quiescence(&child, -beta, -alpha, ply + 1, qdepth - 1);
                if self.stop {
                    return best;
                }
                if score > best {
                    best = score;
                    if score > alpha {
                        alpha = score;
                        if alpha >= beta {
                            break;
                        }
                    }
                }
            }
            if searched == 0 {
                return -(MATE_SCORE - ply as i32);
            }
            return best;
        }

        // The mover may decline every capture, so the static score is a
        // floor for this node
        let stand_pat = evaluate(pos);
        if stand_pat >= beta {
            return stand_pat;
        }
        alpha = alpha.max(stand_pat);

        let mut best = stand_pat;
        for &mv in &generate_active(pos) {
            // Delta pruning: skip a capture whose best-case material
            // gain cannot lift the score to alpha
            if stand_pat + capture_gain(pos, mv) + DELTA_MARGIN <= alpha {
                continue;
            }

            let mut child = match apply_move(pos, mv) {
                Some(c) => c,
                None => continue,
            };
            child.flip();

            let score = -self.quiescence(&child, -beta, -alpha, ply + 1, qdepth - 1);
            if self.stop {
                return best;
            }
            if score > best {
                best = score;
                if score > alpha {
                    alpha = score;
                    if alpha >= beta {
                        break;
                    }
                }
            }
        }
        best
    }

    fn should_stop(&self) -> bool {
        if self.stop {
            return true;
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Most valuable victim first, quiets last, transposition table move at
/// the very front.
fn order_moves(pos: &Position, moves: &mut MoveList, tt_move: Option<Move>) {
    moves
        .as_mut_slice()
        .sort_by_key(|&mv| -capture_gain(pos, mv));
    if let Some(mv) = tt_move {
        moves.promote_to_front(mv);
    }
}

/// Best-case material swing of a move: the victim's value, the en
/// passant pawn for a diagonal step onto an empty square, plus the
/// upgrade for a promotion. Zero for quiet moves.
fn capture_gain(pos: &Position, mv: Move) -> i32 {
    let mut gain = match pos.piece_at(mv.to()) {
        Some(victim) => victim.kind.value(),
        None => 0,
    };

    if let Some(piece) = pos.piece_at(mv.from()) {
        if piece.kind == PieceKind::Pawn {
            if mv.from().col() != mv.to().col() && pos.piece_at(mv.to()).is_none() {
                gain += PieceKind::Pawn.value();
            }
            if mv.to().row() == 0 {
                gain += PieceKind::Queen.value() - PieceKind::Pawn.value();
            }
        }
    }

    gain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, Piece, PieceKind::*, Square};

    #[test]
    fn test_startpos_search_finds_a_move() {
        let mut searcher = Searcher::new();
        let limits = SearchLimits {
            depth: 3,
            ..Default::default()
        };
        let result = searcher.search(&Position::startpos(), &limits);

        assert!(result.best_move.is_some());
        assert_eq!(result.depth, 3);
        assert!(result.nodes > 0);
        // The opening is roughly balanced
        assert!(result.score.abs() < 200);
    }

    #[test]
    fn test_single_legal_move_is_returned() {
        // White king boxed in: rook on column 1 and proximity leave
        // only Ka1-a2
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 0), Piece::new(King, Color::White));
        pos.put_piece(Square::new(0, 7), Piece::new(King, Color::Black));
        pos.put_piece(Square::new(0, 1), Piece::new(Rook, Color::Black));

        let only = Move::new(Square::new(7, 0), Square::new(6, 0));

        let legal: Vec<Move> = generate_moves(&pos)
            .into_iter()
            .filter(|&mv| apply_move(&pos, mv).is_some())
            .collect();
        assert_eq!(legal, vec![only]);

        let mut searcher = Searcher::new();
        let limits = SearchLimits {
            depth: 1,
            ..Default::default()
        };
        assert_eq!(searcher.search(&pos, &limits).best_move, Some(only));
    }

    #[test]
    fn test_mate_in_one_is_found() {
        // Rook ladder: Ra3-a1 mates on the back row while the other
        // rook seals row 1
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 4), Piece::new(King, Color::White));
        pos.put_piece(Square::new(0, 4), Piece::new(King, Color::Black));
        pos.put_piece(Square::new(1, 7), Piece::new(Rook, Color::White));
        pos.put_piece(Square::new(2, 0), Piece::new(Rook, Color::White));

        let mate = Move::new(Square::new(2, 0), Square::new(0, 0));

        let mut searcher = Searcher::new();
        let limits = SearchLimits {
            depth: 2,
            ..Default::default()
        };
        let result = searcher.search(&pos, &limits);

        assert_eq!(result.best_move, Some(mate));
        assert!(result.score >= MATE_SCORE - 16);
    }

    #[test]
    fn test_no_legal_move_returns_none() {
        // Smothered corner stalemate: Ka1 with nothing to do
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 0), Piece::new(King, Color::White));
        pos.put_piece(Square::new(0, 7), Piece::new(King, Color::Black));
        pos.put_piece(Square::new(5, 1), Piece::new(Queen, Color::Black));

        let legal: Vec<Move> = generate_moves(&pos)
            .into_iter()
            .filter(|&mv| apply_move(&pos, mv).is_some())
            .collect();
        assert!(legal.is_empty());

        let mut searcher = Searcher::new();
        let result = searcher.search(&pos, &SearchLimits::default());
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, DRAW_SCORE);
    }

    #[test]
    fn test_quiescence_avoids_poisoned_capture() {
        // QxP on d5 wins a pawn but loses the queen to a pawn
        // recapture one ply beyond the depth-1 horizon
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 4), Piece::new(King, Color::White));
        pos.put_piece(Square::new(0, 4), Piece::new(King, Color::Black));
        pos.put_piece(Square::new(5, 3), Piece::new(Queen, Color::White));
        pos.put_piece(Square::new(3, 3), Piece::new(Pawn, Color::Black));
        pos.put_piece(Square::new(2, 4), Piece::new(Pawn, Color::Black));

        let poisoned = Move::new(Square::new(5, 3), Square::new(3, 3));

        // It is the only material-gaining move on the board, so a bare
        // horizon evaluation would grab it
        let active = generate_active(&pos);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0], poisoned);

        let mut searcher = Searcher::new();
        let limits = SearchLimits {
            depth: 1,
            ..Default::default()
        };
        let result = searcher.search(&pos, &limits);

        assert!(result.best_move.is_some());
        assert_ne!(result.best_move, Some(poisoned));
    }

    #[test]
    fn test_transposition_table_is_neutral_for_best_move() {
        let pos = Position::startpos();

        let mut with_tt = Searcher::new();
        let mut without_tt = Searcher::new();

        let on = SearchLimits {
            depth: 3,
            use_tt: true,
            ..Default::default()
        };
        let off = SearchLimits {
            depth: 3,
            use_tt: false,
            ..Default::default()
        };

        let a = with_tt.search(&pos, &on);
        let b = without_tt.search(&pos, &off);

        assert_eq!(a.best_move, b.best_move);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn test_time_budget_returns_completed_iteration() {
        let mut searcher = Searcher::new();
        let limits = SearchLimits {
            depth: 64,
            time: Some(Duration::from_millis(50)),
            ..Default::default()
        };
        let result = searcher.search(&Position::startpos(), &limits);

        // The budget expires long before depth 64; whatever comes back
        // must stem from a finished iteration
        assert!(result.best_move.is_some());
        assert!(result.depth < 64);
    }

    #[test]
    fn test_capture_gain_accounts_for_promotion_and_en_passant() {
        let mut pos = Position::empty(Color::White);
        pos.put_piece(Square::new(7, 4), Piece::new(King, Color::White));
        pos.put_piece(Square::new(0, 4), Piece::new(King, Color::Black));
        pos.put_piece(Square::new(1, 0), Piece::new(Pawn, Color::White));
        pos.put_piece(Square::new(0, 1), Piece::new(Rook, Color::Black));
        pos.put_piece(Square::new(3, 6), Piece::new(Pawn, Color::White));

        // Push promotion: queen minus pawn
        assert_eq!(
            capture_gain(&pos, Move::new(Square::new(1, 0), Square::new(0, 0))),
            875
        );
        // Capture promotion adds the victim
        assert_eq!(
            capture_gain(&pos, Move::new(Square::new(1, 0), Square::new(0, 1))),
            510 + 875
        );
        // En passant shaped move: pawn diagonal onto empty square
        assert_eq!(
            capture_gain(&pos, Move::new(Square::new(3, 6), Square::new(2, 7))),
            100
        );
        // Quiet move
        assert_eq!(
            capture_gain(&pos, Move::new(Square::new(3, 6), Square::new(2, 6))),
            0
        );
    }
}
