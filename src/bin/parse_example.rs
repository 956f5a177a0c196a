use ocr_text::{extract, ExtractOptions, LogSink};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let data_dir = Path::new("./data");
    if !data_dir.exists() {
        println!("No data/ directory found. Create ./data and place PAGE, ALTO or .txt files there.");
        return Ok(());
    }

    let options = ExtractOptions::default();
    for entry in std::fs::read_dir(data_dir)? {
        let entry = entry?;
        let path = entry.path();
        if let Some(ext) = path.extension() {
            if ext == "xml" || ext == "txt" {
                println!("Extracting {}", path.display());
                let text = extract(&path, &options, &mut LogSink)?;
                println!("Found {} segments", text.segments().len());
                for s in text.segments().iter().take(5) {
                    println!("[{}] {}", s.id(), s.text());
                }
            }
        }
    }

    Ok(())
}
