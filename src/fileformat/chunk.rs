use std::io::BufRead;

use crate::runtime::Error;

///////////////////////////////
/// Layout of one record: a fixed number of consecutive lines, each a named field.
/// Fields marked for deletion are dropped as soon as a chunk is read
#[derive(Clone, Debug)]
pub struct RecordSchema {
    num_fields: usize,
    keep: Vec<bool>,
    kept_names: Vec<String>,
}

impl RecordSchema {
    pub fn new(fields: &[String], fields_to_delete: &[String]) -> RecordSchema {
        let keep: Vec<bool> = fields
            .iter()
            .map(|f| !fields_to_delete.contains(f))
            .collect();
        let kept_names = fields
            .iter()
            .filter(|f| !fields_to_delete.contains(f))
            .cloned()
            .collect();
        RecordSchema {
            num_fields: fields.len(),
            keep,
            kept_names,
        }
    }

    pub fn num_fields(&self) -> usize {
        self.num_fields
    }

    /// Position of a field within the kept fields of a record
    pub fn kept_index(&self, name: &str) -> Option<usize> {
        self.kept_names.iter().position(|f| f == name)
    }

    pub fn kept_names(&self) -> &[String] {
        &self.kept_names
    }
}

///////////////////////////////
/// One batch of records. Each record holds only the kept fields, in schema order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based chunk number
    pub index: usize,
    pub records: Vec<Vec<String>>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Iterate over one kept field of every record
    pub fn field(&self, kept_index: usize) -> impl Iterator<Item = &str> {
        self.records.iter().map(move |r| r[kept_index].as_str())
    }
}

///////////////////////////////
/// Reads a line-oriented source in chunks of a fixed number of records.
///
/// Blank lines are skipped and trailing CR/LF removed. Lines are read as bytes; invalid
/// UTF-8 is replaced rather than failing the run, so a bad byte in a barcode only gets
/// that record rejected. A chunk whose line count does not split evenly into records
/// is an error, and the reader stops after it
pub struct ChunkReader<R: BufRead> {
    reader: R,
    schema: RecordSchema,
    num_records_per_chunk: usize,
    num_chunks_read: usize,
    line: Vec<u8>,
    done: bool,
}

impl<R: BufRead> ChunkReader<R> {
    pub fn new(reader: R, schema: RecordSchema, num_records_per_chunk: usize) -> ChunkReader<R> {
        ChunkReader {
            reader,
            schema,
            num_records_per_chunk,
            num_chunks_read: 0,
            line: Vec::new(),
            done: false,
        }
    }

    ///////////////////////////////
    /// Read the next chunk. Ok(None) at end of input
    pub fn read_chunk(&mut self) -> Result<Option<Chunk>, Error> {
        if self.done {
            return Ok(None);
        }

        let num_fields = self.schema.num_fields;
        let max_lines = self.num_records_per_chunk * num_fields;
        let mut records: Vec<Vec<String>> = Vec::with_capacity(self.num_records_per_chunk);
        let mut current: Vec<String> = Vec::with_capacity(self.schema.kept_names.len());
        let mut num_lines = 0;

        while num_lines < max_lines {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                self.done = true;
                break;
            }
            let mut end = self.line.len();
            while end > 0 && matches!(self.line[end - 1], b'\n' | b'\r') {
                end -= 1;
            }
            if end == 0 {
                continue;
            }

            let pos = num_lines % num_fields;
            if self.schema.keep[pos] {
                current.push(String::from_utf8_lossy(&self.line[..end]).into_owned());
            }
            num_lines += 1;
            if pos == num_fields - 1 {
                records.push(std::mem::take(&mut current));
            }
        }

        if num_lines == 0 {
            self.done = true;
            return Ok(None);
        }

        self.num_chunks_read += 1;
        if num_lines % num_fields != 0 {
            self.done = true;
            return Err(Error::malformed_chunk(
                self.num_chunks_read,
                num_lines,
                num_fields,
            ));
        }

        Ok(Some(Chunk {
            index: self.num_chunks_read,
            records,
        }))
    }
}

impl<R: BufRead> Iterator for ChunkReader<R> {
    type Item = Result<Chunk, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_chunk().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn fastq_schema() -> RecordSchema {
        let fields: Vec<String> = ["name", "seq", "plus", "qual"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let delete: Vec<String> = ["name", "plus", "qual"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        RecordSchema::new(&fields, &delete)
    }

    fn fastq(n: usize) -> String {
        (0..n)
            .map(|i| format!("@r{i}\nACGT{i}\n+\nIIII\n"))
            .collect()
    }

    #[test]
    fn schema_keeps_undeleted_fields() {
        let schema = fastq_schema();
        assert_eq!(schema.num_fields(), 4);
        assert_eq!(schema.kept_names(), &["seq".to_string()]);
        assert_eq!(schema.kept_index("seq"), Some(0));
        assert_eq!(schema.kept_index("qual"), None);
    }

    #[test]
    fn splits_into_chunks() {
        let reader = ChunkReader::new(Cursor::new(fastq(5)), fastq_schema(), 2);
        let chunks: Vec<Chunk> = reader.map(|c| c.unwrap()).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].index, 1);
        assert_eq!(chunks[2].index, 3);
        assert_eq!(chunks.iter().map(|c| c.len()).collect::<Vec<_>>(), vec![2, 2, 1]);

        let seqs: Vec<&str> = chunks[1].field(0).collect();
        assert_eq!(seqs, vec!["ACGT2", "ACGT3"]);
    }

    #[test]
    fn crlf_and_blank_lines() {
        let input = "@r0\r\nAAAA\r\n+\r\nIIII\r\n\r\n\n@r1\nCCCC\n+\nIIII";
        let mut reader = ChunkReader::new(Cursor::new(input), fastq_schema(), 10);
        let chunk = reader.read_chunk().unwrap().unwrap();
        assert_eq!(chunk.field(0).collect::<Vec<_>>(), vec!["AAAA", "CCCC"]);
        assert!(reader.read_chunk().unwrap().is_none());
    }

    #[test]
    fn invalid_utf8_does_not_abort() {
        let mut input: Vec<u8> = b"@r0\nAAAA\n+\nII".to_vec();
        input.extend_from_slice(&[0xff, 0xfe]);
        input.extend_from_slice(b"\n@r1\nCC");
        input.push(0xff);
        input.extend_from_slice(b"C\n+\nIIII\n");

        let mut reader = ChunkReader::new(Cursor::new(input), fastq_schema(), 10);
        let chunk = reader.read_chunk().unwrap().unwrap();
        assert_eq!(chunk.len(), 2);
        let seqs: Vec<&str> = chunk.field(0).collect();
        assert_eq!(seqs[0], "AAAA");
        assert_eq!(seqs[1], "CC\u{FFFD}C");
    }

    #[test]
    fn empty_input() {
        let mut reader = ChunkReader::new(Cursor::new(""), fastq_schema(), 10);
        assert!(reader.read_chunk().unwrap().is_none());
    }

    #[test]
    fn truncated_record_is_an_error() {
        let mut input = fastq(3);
        input.push_str("@r3\nACGT\n");
        let mut reader = ChunkReader::new(Cursor::new(input), fastq_schema(), 2);
        assert_eq!(reader.next().unwrap().unwrap().len(), 2);
        match reader.next() {
            Some(Err(Error::MalformedChunk {
                chunk,
                lines,
                fields,
            })) => {
                assert_eq!((chunk, lines, fields), (2, 6, 4));
            }
            other => panic!("expected malformed chunk, got {:?}", other.map(|r| r.map(|c| c.len()))),
        }
        assert!(reader.next().is_none());
    }
}
