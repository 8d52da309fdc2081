// Reading CSV files and comparing exports with a reference.

use text_diff::print_diff;

use crate::admin::*;

pub fn read_csv_file(path: &str, legacy: bool) -> AdminResult<Table> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    debug!(
        "read_csv_file: {:?}: {} bytes, legacy reader: {}",
        path,
        contents.len(),
        legacy
    );
    let table = if legacy {
        csv_codec::decode_heuristic(&contents)
    } else {
        csv_codec::decode(&contents)
    };
    table.context(CsvImportSnafu { path })
}

/// Fails if the produced text differs from the content of the reference
/// file. Line endings are not significant.
pub fn check_reference(text: &str, reference_path: &str) -> AdminResult<()> {
    let reference = fs::read_to_string(reference_path).context(OpeningFileSnafu {
        path: reference_path,
    })?;
    let reference = reference.replace("\r\n", "\n");
    if reference != text {
        warn!("Found differences with the reference {:?}", reference_path);
        print_diff(reference.as_str(), text, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("Output matches the reference {:?}", reference_path);
    Ok(())
}
