use std::io::{BufRead, Write};

/// Asks for the export batch size. 0 means one file for everything; any
/// non-numeric response (or closed input) cancels the export.
pub fn batch_size<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> std::io::Result<Option<usize>> {
    writeln!(
        output,
        "Enter max words per file, 0 to save all together, or anything else to cancel."
    )?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(line.trim().parse().ok())
}
