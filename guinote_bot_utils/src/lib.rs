use guinote::{GameConfig, GameState, Move, Okay, PlayerId, Request};

/// A trait to simplify writing bots.
pub trait Bot {
    fn new_game(&mut self, seat: PlayerId, config: GameConfig);
    fn act(&mut self, state: &GameState) -> anyhow::Result<Move>;

    fn run(&mut self) -> anyhow::Result<()> {
        // Communication happens through stdin/stdout.
        // Stderr can be used for logging.
        let mut stdin = std::io::stdin().lock();
        let mut stdout = std::io::stdout().lock();
        let mut buf = String::new();

        loop {
            // Read the next line into buf
            buf.clear(); // because stdin.read_line() appends to the buffer
            use std::io::BufRead;
            let num_bytes_read = stdin.read_line(&mut buf)?;
            if num_bytes_read == 0 {
                // 0 bytes read means EOF - the judge has exited.
                break Ok(());
            }

            let req = serde_json::from_str::<Request>(buf.trim_end())?;

            match req {
                Request::NewGame { seat, config } => {
                    self.new_game(seat, config);
                    serde_json::to_writer(&mut stdout, &Okay())?;
                }
                Request::Act { state } => {
                    serde_json::to_writer(&mut stdout, &self.act(&state)?)?;
                }
                Request::Bye => break Ok(()),
            }
            use std::io::Write;
            writeln!(stdout)?;
            stdout.flush()?;
        }
    }
}
