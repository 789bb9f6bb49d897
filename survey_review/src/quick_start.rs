/*!

# Quick start

This example walks through one review round end to end, starting from a
survey collected with an online form tool. Any provider that can export
responses as a spreadsheet works (Google Forms, Microsoft Forms, Qualtrics).

**Collecting the responses** Create your survey as usual. The only
requirement on the export is a `Name` column holding the respondent's
display name; every other column is shown as a question/answer pair.

**Exporting** Download the responses in the Excel format (xlsx) or as CSV.
A minimal CSV export looks like this:

```text
Name,Role,Why do you want to join?
Alice,Engineer,I enjoy building data tools
Bob,Designer,Looking for a new challenge
```

**Reviewing** Start a session on the exported file:

```bash
svreview -i responses.xlsx --reviewer Pat
```

The list view shows every respondent with an indicator of the latest rating.
Open one, rate it and leave a comment:

```text
> open 1
> status approved
> comment Strong background, clear motivation
> back
```

Ratings are saved to `reviews.json` immediately after every change; a second
reviewer can later run the same command with their own `--reviewer` name and
the tool will show both opinions side by side.

**Filtering** Within the list, `search ali` narrows by name and
`filter Declined` keeps only respondents somebody declined. Filters combine.

**The summary** Once everyone has reviewed, the cross-reviewer matrix is one
command away:

```bash
svreview -i responses.xlsx --summary --out round1_summary.json
```

The table has one column pair (status, comment) per reviewer, sorted by
reviewer name, and one row per respondent in dataset order. The JSON written
by `--out` can be archived and later used with `--reference` to verify that
a re-export still produces the same summary.

*/
