use anyhow::Context;

use sarsa2048_engine::{BOARD_SIZE, Board, CELL_COUNT, Direction, StateId};
use sarsa2048_evaluator::{board_feature::FeatureSet, feature_extractor::FeatureExtractor};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InspectArg {
    /// Board cells in row-major order, comma-separated (0 = empty)
    #[arg(long, value_delimiter = ',', required_unless_present = "state_id")]
    board: Option<Vec<u32>>,
    /// Base-11 state identifier
    #[arg(long, conflicts_with = "board")]
    state_id: Option<u64>,
    /// Feature set to evaluate
    #[arg(long, default_value = "full")]
    features: FeatureSet,
}

fn board_from_cells(cells: &[u32]) -> anyhow::Result<Board> {
    anyhow::ensure!(
        cells.len() == CELL_COUNT,
        "expected {CELL_COUNT} cells, got {}",
        cells.len()
    );
    let mut rows = [[0; BOARD_SIZE]; BOARD_SIZE];
    for (row, chunk) in rows.iter_mut().zip(cells.chunks(BOARD_SIZE)) {
        row.copy_from_slice(chunk);
    }
    Ok(Board::from_rows(rows))
}

pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let board = match (&arg.board, arg.state_id) {
        (Some(cells), _) => board_from_cells(cells)?,
        (None, Some(id)) => Board::try_from(StateId::new(id))
            .with_context(|| format!("Cannot decode state id {id}"))?,
        (None, None) => anyhow::bail!("Either --board or --state-id is required"),
    };
    let state_id = board.to_state_id().context("Board cannot be encoded")?;

    println!("{board}");
    println!("Status:   {:?}", board.status());
    println!("State id: {state_id}");
    if state_id.is_win() {
        return Ok(());
    }

    let extractor = FeatureExtractor::from_set(arg.features);
    let ids = extractor.ids();
    let width = ids.iter().map(String::len).max().unwrap_or(0);
    for direction in Direction::ALL {
        let changed = board.can_move(direction);
        println!();
        println!("{direction}{}", if changed { "" } else { " (no-op)" });
        for (id, value) in ids.iter().zip(extractor.extract(&board, Some(direction))) {
            println!("  {id:<width$} {value:>14.4}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_from_cells() {
        let mut cells = [0; CELL_COUNT];
        cells[1] = 2;
        cells[15] = 1024;
        let board = board_from_cells(&cells).unwrap();
        assert_eq!(board.get(0, 1), 2);
        assert_eq!(board.get(3, 3), 1024);
        assert!(board_from_cells(&cells[..15]).is_err());
    }
}
