use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdin, stdout, Write};

use connect4_engine::agents::MoveSelector;
use connect4_engine::*;

// plies of lookahead for the AI players
const AI_SEARCH_DEPTH: u32 = 8;

fn draw_board(board: &Board) -> Result<()> {
    let mut stdout = stdout();

    let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;
    for _ in 0..HEIGHT {
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;

    let (origin_x, origin_y) = crossterm::cursor::position()?;

    for row in 0..HEIGHT {
        for column in 0..WIDTH {
            let (pos_x, pos_y) = (origin_x + column as u16, origin_y - row as u16);

            stdout
                .queue(MoveTo(pos_x, pos_y))?
                .queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match board.cell(column, row) {
                            Cell::PlayerOne => Color::Red,
                            Cell::PlayerTwo => Color::Yellow,
                            Cell::Empty => Color::DarkBlue,
                        }),
                ))?;
        }
    }
    stdout
        .queue(MoveTo(origin_x + WIDTH as u16, origin_y))?
        .queue(PrintStyledContent(style("\n")))?;
    stdout.flush()?;
    Ok(())
}

// y/n prompt for AI control of one player
fn ask_ai_controlled(player: usize) -> Result<bool> {
    let stdin = stdin();
    loop {
        let mut buffer = String::new();
        print!("Is player {} AI controlled? y/n: ", player);
        stdout().flush().expect("failed to flush to stdout!");
        stdin.read_line(&mut buffer)?;
        match buffer.to_lowercase().chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}

fn main() -> Result<()> {
    let mut board = Board::new();

    let stdin = stdin();

    println!("Welcome to Connect 4\n");

    // each AI player keeps its own solver so the transposition cache
    // carries over between its moves
    let mut players: [Option<Solver>; 2] = [None, None];
    for (idx, player) in players.iter_mut().enumerate() {
        if ask_ai_controlled(idx + 1)? {
            *player = Some(Solver::new(AI_SEARCH_DEPTH));
        }
    }
    let all_ai = players.iter().all(|p| p.is_some());

    // game loop
    loop {
        draw_board(&board).expect("Failed to draw board!");

        match board.result() {
            GameResult::Undetermined => {
                let mover = if board.turn() == Cell::PlayerOne { 0 } else { 1 };

                let next_move = if let Some(solver) = players[mover].as_mut() {
                    println!("AI is thinking...");
                    stdout().flush().expect("Failed to flush to stdout!");

                    // slow down play if both players are AI
                    if all_ai {
                        std::thread::sleep(std::time::Duration::new(3, 0));
                    }

                    let best_move = solver.select_move(&board)?;
                    let outlook = solver.evaluate(&board, AI_SEARCH_DEPTH);
                    println!(
                        "AI evaluation: {} ({} positions searched)",
                        outlook, solver.node_count
                    );
                    println!("Best move: {}", best_move + 1);
                    best_move
                // human player
                } else {
                    print!("Move input > ");
                    stdout().flush().expect("Failed to flush to stdout!");
                    let mut input_str = String::new();
                    stdin.read_line(&mut input_str)?;

                    match input_str.trim().parse::<u8>() {
                        Err(_) => {
                            println!("Invalid number: {}", input_str);
                            continue;
                        }
                        Ok(column @ 1..=7) => column - 1,
                        Ok(column) => {
                            println!("Column {} out of range", column);
                            continue;
                        }
                    }
                };

                if let Err(err) = board.play(next_move) {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
            }

            // end states
            GameResult::PlayerOneWin => {
                println!("Player 1 wins!");
                break;
            }
            GameResult::PlayerTwoWin => {
                println!("Player 2 wins!");
                break;
            }
            GameResult::Tie => {
                println!("Tie!");
                break;
            }
        }
    }
    Ok(())
}
