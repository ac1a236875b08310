use crate::board::{Board, Turn};
use crate::game::{Game, GameConfig, Submission};
use crate::piece::{Color, Outcome};
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Text front end: one turn per line, such as `e2 e4` or `e2e4`.
pub struct ConsoleHandler {
    game: Game,
    config: GameConfig,
    start: Board,
}

impl ConsoleHandler {
    pub fn new(config: GameConfig) -> Self {
        ConsoleHandler {
            game: Game::with_config(config),
            config,
            start: Board::new(),
        }
    }

    /// White moves first from `board`. Fails if black is already in check.
    pub fn from_board(board: Board, config: GameConfig) -> Result<Self> {
        let game = Game::from_board(board.clone(), Color::White, config)?;
        Ok(ConsoleHandler {
            game,
            config,
            start: board,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut reader = stdin.lock();
        let mut line = String::new();

        println!("{}\n", self.game.board());
        if let Some(outcome) = self.game.outcome() {
            println!("{}", result_line(outcome));
            return Ok(());
        }
        print!("{} turn: ", self.game.side_to_move());
        stdout.flush()?;

        while reader.read_line(&mut line).context("reading from stdin")? > 0 {
            let command = line.trim();
            if command == "quit" {
                break;
            }

            print!("{}", self.handle_command(command)?);
            if self.game.is_finished() {
                break;
            }
            print!("{} turn: ", self.game.side_to_move());
            stdout.flush()?;
            line.clear();
        }
        Ok(())
    }

    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        match command {
            "" => Ok(String::new()),
            "board" => Ok(format!("{}\n", self.game.board())),
            "new" => {
                self.game = Game::from_board(self.start.clone(), Color::White, self.config)?;
                Ok(format!("{}\n", self.game.board()))
            }
            "moves" => self.handle_moves(),
            "history" => Ok(self.handle_history()),
            _ => self.handle_turn(command),
        }
    }

    fn handle_moves(&self) -> Result<String> {
        let moves: Vec<String> = self
            .game
            .legal_moves()?
            .iter()
            .map(|turn| turn.to_string())
            .collect();
        Ok(format!("{}\n", moves.join(" ")))
    }

    fn handle_history(&self) -> String {
        let mut output = String::new();
        for (index, pair) in self.game.history().chunks(2).enumerate() {
            let moves: Vec<String> = pair.iter().map(|record| record.to_string()).collect();
            output.push_str(&format!("{}. {}\n", index + 1, moves.join(" ")));
        }
        output
    }

    fn handle_turn(&mut self, command: &str) -> Result<String> {
        let turn: Turn = match command.parse() {
            Ok(turn) => turn,
            Err(err) => return Ok(format!("{err}, please try again\n")),
        };

        let submission = self
            .game
            .submit_move(turn)
            .with_context(|| format!("applying {turn}"))?;
        let record = match submission {
            Submission::Accepted(record) => record,
            Submission::Rejected(reason) => {
                return Ok(format!(
                    "invalid move ({reason}), please try again\n{}\n",
                    self.game.board()
                ));
            }
        };

        let mut output = format!("{}\n{}\n", record, self.game.board());
        match self.game.outcome() {
            Some(outcome) => output.push_str(&format!("{}\n", result_line(outcome))),
            None if record.is_check() => output.push_str("check\n"),
            None => {}
        }
        Ok(output)
    }
}

fn result_line(outcome: Outcome) -> String {
    match outcome {
        Outcome::Winner(color) => format!("{color} is the winner"),
        Outcome::Draw => "the game is a draw".to_string(),
    }
}
