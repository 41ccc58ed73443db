//! The `gradewise init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("gradewise.toml");
    if path.exists() {
        println!("gradewise.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG)?;
        println!("Created gradewise.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit gradewise.toml if tesseract is not on your PATH");
    println!(
        "  2. Run: gradewise evaluate --student Ada --subject Biology \\\n           --reference reference.txt --answer-image answer.png"
    );
    println!("  3. Run: gradewise show");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gradewise configuration

# Directory holding evaluation_results.csv (default: ~/Documents)
# dataset_dir = "~/Documents"

# OCR binary used for answer images
tesseract_cmd = "tesseract"
# tessdata_prefix = "/usr/share/tesseract-ocr/5/tessdata"
ocr_timeout_secs = 60

# Open the dataset in the default viewer after each evaluation
open_after_save = true
# viewer_command = ["libreoffice", "--calc"]
"#;
