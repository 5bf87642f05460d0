//! Filename classification helpers for imported dashboard files.

/// File extensions that identify genomic data formats.
const GENOMIC_EXTENSIONS: [&str; 13] = [
    "vcf", "txt", "tsv", "csv", "fasta", "fa", "fastq", "fq", "bam", "sam", "bed", "gff", "gtf",
];

/// Lowercased extension of `filename`, or an empty string when there is none.
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// Whether the filename looks like a genomic data file.
pub fn is_genomic_file(filename: &str) -> bool {
    let ext = file_extension(filename);
    GENOMIC_EXTENSIONS.contains(&ext.as_str())
}

/// MIME type guessed from the file extension.
///
/// The dashboard serves mostly text based genomic formats, so unknown
/// extensions default to `text/plain` rather than an octet stream.
pub fn mime_type(filename: &str) -> &'static str {
    match file_extension(filename).as_str() {
        "vcf" | "txt" | "fasta" | "fa" | "fastq" | "fq" | "bed" | "gff" | "gtf" => "text/plain",
        "tsv" => "text/tab-separated-values",
        "csv" => "text/csv",
        "json" => "application/json",
        "gz" => "application/gzip",
        _ => "text/plain",
    }
}
