/*!

This is the long-form manual for `survey_review` and `svreview`.

## Input formats

The following dataset formats are supported:
* `xlsx` Excel workbooks, as exported by Microsoft Forms, Google Forms and
  most survey tools
* `csv` Comma Separated Values

In both cases the first row is the header. The column named `Name` is the
respondent identity; every other column is treated as a question, with the
cell content as that respondent's answer. Columns keep their original order.

### `xlsx`

The first worksheet of the workbook is read. Empty cells are skipped, so a
respondent only carries the questions they actually answered.

### `csv`

Same conventions as `xlsx`. Ragged rows are tolerated: missing trailing cells
are treated as unanswered questions.

## Respondent identity

The identity of a respondent is its `Name` cell, verbatim. There is no
uniqueness guarantee: two rows sharing a name stay separate entries in the
list view but share a single set of review records. Rows without a usable
name are grouped under the `unknown` identity. This mirrors the behavior of
the original hosted tool and is a documented limitation, not something the
readers try to repair.

## The review state file

All ratings and comments live in a single JSON file (`reviews.json` by
default, `--state` to override). The file is read once at startup and
rewritten in full after every rating or comment change, so killing the
process never loses more than nothing. A missing or unreadable file simply
means an empty review state.

The file is a string-to-string map keyed by a versioned entry name; the
current format version is `reviews_v1`.

## Session commands

The interactive session reads one command per line:

| command | effect |
|---------------------|-----------------------------------------------|
| `reviewer <name>` | set the active reviewer |
| `load <path>` | replace the dataset |
| `search [text]` | filter the list by name substring |
| `user [name]` | select one respondent name (clears `search`) |
| `filter <value>` | `All`, `Approved`, `Declined` or `Tentative` |
| `open <n>` | open the n-th listed respondent |
| `status <value>` | rate the opened respondent |
| `comment [text]` | comment on the opened respondent |
| `summary` | show the cross-reviewer summary table |
| `back`, `list` | return to the list |
| `help`, `quit` | |

A reviewer name is required before opening a respondent; ratings and
comments are always recorded under the active reviewer.

## Summary export

`--summary` prints the cross-reviewer table and exits without starting a
session. `--out` writes the same table as JSON, either to a file or to
`stdout`. `--reference` compares the produced JSON against a previously
exported file and fails with a printed diff when they differ, which is handy
for regression-checking a review round.

*/
