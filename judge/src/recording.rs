use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::value::RawValue;

/// Accumulates the request/response lines of one game and dumps them as a
/// JSON file, one file per game.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    requests: Vec<RequestToPlayer>,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            requests: Vec::new(),
        })
    }

    pub fn store_request(
        &mut self,
        player: &str,
        request: String,
        response: String,
    ) -> anyhow::Result<()> {
        // Request and response are already JSON; RawValue embeds them
        // without re-escaping.
        self.requests.push(RequestToPlayer {
            player: String::from(player),
            request: RawValue::from_string(String::from(request.trim_end()))?,
            response: RawValue::from_string(response)?,
        });
        Ok(())
    }

    pub fn write_game_recording(&mut self) -> anyhow::Result<()> {
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let writer = BufWriter::new(File::create(filepath)?);
        serde_json::to_writer_pretty(writer, &std::mem::take(&mut self.requests))?;
        self.num += 1;
        Ok(())
    }
}

#[derive(Serialize)]
pub struct RequestToPlayer {
    player: String,
    request: Box<RawValue>,
    response: Box<RawValue>,
}
