//! One-off scoring from the command line, without starting the server.

use std::io::Read;

use anyhow::Context;
use clap::Args;
use newscheck_ai::Predictor;

use crate::ArtifactsArg;

#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub artifacts: ArtifactsArg,

    /// Article text. Read from stdin when omitted.
    pub text: Option<String>,
}

pub fn run(args: &PredictArgs) -> anyhow::Result<()> {
    let predictor = Predictor::load(&args.artifacts.dir).with_context(|| {
        format!(
            "loading model artifacts from {}",
            args.artifacts.dir.display()
        )
    })?;

    let text = match &args.text {
        Some(text) => text.clone(),
        None => read_stdin()?,
    };

    let prediction = predictor
        .predict_text(&text)
        .context("scoring article")?;
    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("reading article from stdin")?;
    Ok(text)
}
